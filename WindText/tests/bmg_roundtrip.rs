use pretty_assertions::assert_eq;
use windtext::formats::bmg::{HEADER_SIZE, INF1_HEADER_SIZE, RECORD_SIZE};
use windtext::prelude::*;

fn sample_messages() -> Vec<Message> {
    let mut greeting = Message::new(1);
    greeting.text = "Hello, {{sailor}}!{1A:0003:0102}".to_string();
    greeting.line_count = 3;
    greeting.next_message_id = 2;

    let mut shop = Message::new(2);
    shop.text = "Buy it?\n{00:0000}Yes".to_string();
    shop.item_image = ItemId::from_name("Telescope").unwrap_or(ItemId(0x20));
    shop.item_price = -25;
    shop.box_type = 1;
    shop.draw_type = 2;
    shop.box_position = 3;
    shop.initial_sound = 4;
    shop.camera_behavior = 5;
    shop.speaker_anim = 6;
    shop.unknown_1 = 0xBEEF;
    shop.unknown_2 = 7;
    shop.unknown_3 = 8;
    shop.unknown_4 = 9;

    // Unused slot with no text
    let free = Message::new(0);

    vec![greeting, shop, free]
}

fn bank_for(encoding: TextEncoding) -> MessageBank {
    let mut messages = sample_messages();
    let native = match encoding {
        TextEncoding::LegacyWestern => "Šarunas café ĞŽ ų",
        TextEncoding::LegacyJapanese => "リンク",
        TextEncoding::Utf16Be | TextEncoding::Utf8 => "リンク Šarūnas ų",
    };
    let mut native_message = Message::new(3);
    native_message.text = native.to_string();
    messages.push(native_message);
    MessageBank::from_messages(encoding, messages)
}

#[test]
fn test_roundtrip_all_encodings() {
    for encoding in TextEncoding::ALL {
        let bank = bank_for(encoding);
        let bytes = bmg_to_bytes(&bank).unwrap();
        let decoded = parse_bmg_bytes(&bytes).unwrap();

        assert_eq!(decoded.encoding(), encoding);
        assert_eq!(decoded.messages(), bank.messages(), "{encoding}");

        let again = bmg_to_bytes(&decoded).unwrap();
        assert_eq!(again, bytes, "re-encode under {encoding}");
    }
}

#[test]
fn test_offset_integrity() {
    for encoding in TextEncoding::ALL {
        let bank = bank_for(encoding);
        let bytes = bmg_to_bytes(&bank).unwrap();

        let inf1_size = u32::from_be_bytes(bytes[0x24..0x28].try_into().unwrap()) as usize;
        let text_start = HEADER_SIZE + inf1_size + 8;

        for (i, message) in bank.messages().iter().enumerate() {
            let record = HEADER_SIZE + INF1_HEADER_SIZE + i * RECORD_SIZE;
            let offset = u32::from_be_bytes(bytes[record..record + 4].try_into().unwrap()) as usize;
            let text = encoding.decode_at(&bytes, text_start + offset).unwrap();
            assert_eq!(text, message.text, "message {i} under {encoding}");
        }
    }
}

#[test]
fn test_header_layout() {
    let bank = bank_for(TextEncoding::Utf16Be);
    let bytes = bmg_to_bytes(&bank).unwrap();

    assert_eq!(&bytes[0..8], b"MESGbmg1");
    assert_eq!(
        u32::from_be_bytes(bytes[8..12].try_into().unwrap()) as usize,
        bytes.len()
    );
    assert_eq!(u32::from_be_bytes(bytes[12..16].try_into().unwrap()), 2);
    assert_eq!(bytes[16], 2);
    assert_eq!(&bytes[0x20..0x24], b"INF1");
    assert_eq!(u16::from_be_bytes([bytes[0x28], bytes[0x29]]), 4);
    assert_eq!(u16::from_be_bytes([bytes[0x2A], bytes[0x2B]]), 0x18);

    let zeroed = bmg_to_bytes_with_options(&bank, EncodeOptions { zero_total_size: true }).unwrap();
    assert_eq!(&zeroed[8..12], &[0, 0, 0, 0]);
    assert_eq!(parse_bmg_bytes(&zeroed).unwrap().messages(), bank.messages());
}

#[test]
fn test_add_message_ids() {
    let mut bank = bank_for(TextEncoding::LegacyWestern);
    let len = bank.len();

    // Fills the free slot first
    let pos = bank.add_message().unwrap();
    assert_eq!(pos, 2);
    assert_eq!(bank.len(), len);
    let reused = &bank.messages()[pos];
    assert_eq!(reused.id, 4);
    assert_eq!(reused.line_count, 1);
    assert!(reused.item_image.is_none());

    for expected in 5..10u16 {
        let pos = bank.add_message().unwrap();
        assert_eq!(bank.messages()[pos].id, expected);
        assert_eq!(bank.highest_id(), expected);
    }
    assert_eq!(bank.len(), len + 5);

    let mut ids: Vec<u16> = bank.messages().iter().map(|m| m.id).filter(|&id| id != 0).collect();
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), count);
}

#[test]
fn test_filter_queries() {
    let mut messages = sample_messages();
    let mut duplicate = Message::new(7);
    duplicate.text = "HELLO again".to_string();
    messages.push(duplicate.clone());
    messages.push(duplicate);
    let bank = MessageBank::from_messages(TextEncoding::LegacyWestern, messages);

    assert_eq!(bank.filter("msgid:7").len(), 2);
    assert!(bank.filter("msgid:42").is_empty());

    let at_two = bank.filter("index:2");
    assert_eq!(at_two.len(), 1);
    assert_eq!(at_two[0].index, 2);

    let hello: Vec<u16> = bank.filter("hello").iter().map(|m| m.id).collect();
    assert_eq!(hello, vec![1, 7, 7]);

    assert_eq!(bank.filter("").len(), bank.len());
    assert_eq!(bank.filter("msgid:abc").len(), bank.len());
    assert_eq!(bank.filter("speaker:3").len(), bank.len());
}

#[test]
fn test_csv_escaping() {
    let mut message = Message::new(1);
    message.text = "He said \"hi\"".to_string();
    let bank = MessageBank::from_messages(TextEncoding::LegacyWestern, vec![message]);

    assert_eq!(build_csv(&bank), "ID,Text\n0,\"He said \\\"hi\\\"\"\n");
}

#[test]
fn test_western_remap() {
    assert_eq!(TextEncoding::LegacyWestern.decode_at(&[0x86, 0x00], 0).unwrap(), "Š");
    assert_eq!(TextEncoding::LegacyWestern.encode("Š").unwrap(), vec![0x86, 0x00]);
}

#[test]
fn test_unknown_encoding_tag() {
    let mut bytes = bmg_to_bytes(&bank_for(TextEncoding::Utf8)).unwrap();
    bytes[16] = 99;
    assert!(matches!(
        parse_bmg_bytes(&bytes),
        Err(Error::UnsupportedEncoding { tag: 99 })
    ));
}

#[test]
fn test_truncated_bank() {
    let bytes = bmg_to_bytes(&bank_for(TextEncoding::Utf8)).unwrap();
    for len in [0, 16, 40, bytes.len() - 1] {
        assert!(parse_bmg_bytes(&bytes[..len]).is_err(), "length {len}");
    }
}

#[test]
fn test_unencodable_text() {
    let mut message = Message::new(1);
    message.text = "リンク".to_string();
    let bank = MessageBank::from_messages(TextEncoding::LegacyWestern, vec![message]);
    assert!(matches!(
        bmg_to_bytes(&bank),
        Err(Error::UnencodableText { .. })
    ));
}

#[test]
fn test_unresolved_references() {
    let mut messages = sample_messages();
    messages[1].next_message_id = 500;
    let bank = MessageBank::from_messages(TextEncoding::LegacyWestern, messages);

    let problems = bank.unresolved_references();
    assert_eq!(problems.len(), 1);
    assert!(matches!(
        problems[0],
        Error::UnresolvedReference { from: 2, to: 500 }
    ));
}
