use pretty_assertions::assert_eq;
use tempfile::tempdir;
use windtext::prelude::*;

fn western_bank() -> MessageBank {
    let mut first = Message::new(1);
    first.text = "Welcome to Outset Island.".to_string();
    let mut second = Message::new(2);
    second.text = "Ąžuolas{00:0001}".to_string();
    MessageBank::from_messages(TextEncoding::LegacyWestern, vec![first, second])
}

#[test]
fn test_directory_session_roundtrip() {
    let dir = tempdir().unwrap();
    let mut store = DirectoryArchive::open(dir.path()).unwrap();
    let mut bank = western_bank();
    bank.save_to(&mut store, "res/Msg/zel_00.bmg", EncodeOptions::default())
        .unwrap();
    assert!(dir.path().join("res").join("Msg").join("zel_00.bmg").is_file());

    let mut session = BankSession::open(store, "res/Msg/zel_00.bmg", EncodeOptions::default()).unwrap();
    assert_eq!(session.bank().messages(), western_bank().messages());

    let pos = session.bank_mut().add_message().unwrap();
    session.bank_mut().messages_mut()[pos].text = "Grandma's soup".to_string();
    assert!(session.is_dirty());
    session.save().unwrap();
    assert!(!session.is_dirty());

    let reloaded = read_bmg(dir.path().join("res/Msg/zel_00.bmg")).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.get_by_id(3).unwrap().text, "Grandma's soup");
    assert_eq!(reloaded.get_by_id(2).unwrap().text, "Ąžuolas{00:0001}");
}

#[test]
fn test_memory_archive_keeps_other_files() {
    let mut store = MemoryArchive::new();
    store.insert("other.bin", vec![1, 2, 3]).unwrap();

    let mut bank = western_bank();
    bank.save_to(&mut store, DEFAULT_BANK_PATH, EncodeOptions::default())
        .unwrap();

    assert_eq!(store.paths().unwrap(), vec!["other.bin", "zel_00.bmg"]);
    assert_eq!(store.file("other.bin"), Some(&[1u8, 2, 3][..]));
    assert_eq!(
        store.file(DEFAULT_BANK_PATH).map(<[u8]>::to_vec),
        Some(bmg_to_bytes(&bank).unwrap())
    );
}

#[test]
fn test_unencodable_edit_is_not_saved() {
    let mut store = MemoryArchive::new();
    let mut bank = western_bank();
    bank.save_to(&mut store, DEFAULT_BANK_PATH, EncodeOptions::default())
        .unwrap();
    let before = store.get(DEFAULT_BANK_PATH).unwrap();

    bank.set_text(1, "風のタクト");
    assert!(matches!(
        bank.save_to(&mut store, DEFAULT_BANK_PATH, EncodeOptions::default()),
        Err(Error::UnencodableText { .. })
    ));
    assert!(bank.is_dirty());
    assert_eq!(store.get(DEFAULT_BANK_PATH).unwrap(), before);
}

#[test]
fn test_config_encode_options() {
    let config = Config::from_toml("[encode]\nzero_total_size = true\n").unwrap();
    let mut store = MemoryArchive::new();
    let mut bank = western_bank();
    bank.save_to(&mut store, &config.bank_path, config.encode_options())
        .unwrap();

    let bytes = store.file(&config.bank_path).unwrap();
    assert_eq!(&bytes[8..12], &[0u8; 4]);
    assert_eq!(MessageBank::load_from(&store, "zel_00.bmg").unwrap().len(), 2);
}
