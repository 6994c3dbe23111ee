//! The machine is its own inverse: converting the ciphertext from the same
//! starting configuration yields the plaintext, and no symbol ever
//! encrypts to itself.

use enigma::config::{MachineConfig, Settings, NAVAL_CONFIG};

const PLAINTEXT: &str = "THE ENEMY FLEET HAS LEFT HARBOUR HEADING NORTH NORTH WEST \
                         SPEED TWELVE KNOTS REPORT POSITION EVERY FOUR HOURS";

#[test]
fn round_trip_across_settings() {
    let config = MachineConfig::parse(NAVAL_CONFIG).unwrap();
    let settings = [
        "* B Beta I II III AAAA",
        "* B Gamma VIII VI IV ZZZZ",
        "* C Beta V VII II MQEV FXBK (AM) (FI) (NV) (PS) (TU) (WZ)",
        "* C Gamma III VIII I ADUQ BBBB (QW) (ER) (TY) (UI) (OP) (AS) (DF) (GH) (JK) (LZ)",
    ];

    for line in settings {
        let settings = Settings::parse(line, config.num_rotor_slots()).unwrap();
        let mut machine = config.build_machine().unwrap();
        settings.apply(&mut machine).unwrap();

        let cipher = machine.convert_message(PLAINTEXT).unwrap();
        let plain: String = PLAINTEXT.split_whitespace().collect();
        assert_eq!(cipher.len(), plain.len(), "{}", line);
        for (p, c) in plain.chars().zip(cipher.chars()) {
            assert_ne!(p, c, "self-encryption under {}", line);
        }

        let mut fresh = config.build_machine().unwrap();
        settings.apply(&mut fresh).unwrap();
        assert_eq!(fresh.convert_message(&cipher).unwrap(), plain, "{}", line);

        machine.reset();
        assert_eq!(machine.convert_message(&cipher).unwrap(), plain, "{}", line);
    }
}

#[test]
fn every_index_is_an_involution_at_each_position() {
    let config = MachineConfig::parse(NAVAL_CONFIG).unwrap();
    let mut machine = config.build_machine().unwrap();
    Settings::parse("* B Beta III IV I AXLE (HQ) (EX)", config.num_rotor_slots())
        .unwrap()
        .apply(&mut machine)
        .unwrap();

    // Two machines kept in lock step, one encrypting and one decrypting.
    let mut mirror = machine.clone();
    for round in 0..200 {
        let input = round % 26;
        let output = machine.convert_index(input).unwrap();
        assert_eq!(mirror.convert_index(output).unwrap(), input, "round {}", round);
    }
}

#[test]
fn whitespace_is_not_counted() {
    let config = MachineConfig::parse(NAVAL_CONFIG).unwrap();
    let settings = Settings::parse("* B Beta I II III AAAA", 5).unwrap();

    let mut spaced = config.build_machine().unwrap();
    settings.apply(&mut spaced).unwrap();
    let mut packed = config.build_machine().unwrap();
    settings.apply(&mut packed).unwrap();

    assert_eq!(
        spaced.convert_message(" HEL\tLO\nWOR LD ").unwrap(),
        packed.convert_message("HELLOWORLD").unwrap()
    );
    assert_eq!(spaced.positions(), packed.positions());
}
