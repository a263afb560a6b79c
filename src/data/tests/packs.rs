use crate::assert_err;
use crate::data::packs::PACK_TARGET_LINES;
use crate::data::{BUILTIN_PACK_IDS, DataError, builtin_pack_docs, pack_descriptors};
use std::collections::HashSet;

#[test]
fn test_every_pack_has_sixty_unique_docs() {
    for pack_id in BUILTIN_PACK_IDS {
        let docs = builtin_pack_docs(pack_id).unwrap();
        assert_eq!(docs.len(), PACK_TARGET_LINES, "pack {pack_id}");

        let unique: HashSet<&String> = docs.iter().collect();
        assert_eq!(unique.len(), docs.len(), "pack {pack_id} 存在重复行");
        assert!(docs.iter().all(|d| !d.trim().is_empty() && d.trim() == d));
    }
}

#[test]
fn test_pack_contents() {
    let arithmetic = builtin_pack_docs("arithmetic").unwrap();
    assert_eq!(arithmetic[0], "0+0=0");
    assert_eq!(arithmetic[20], "1+9=10");
    assert_eq!(arithmetic[40], "0-0=0");

    let chess = builtin_pack_docs("chess_pgn").unwrap();
    assert_eq!(chess[0], "1. e4 e5 2. Nf3 Nc6 3. Bb5 a6");

    let regex = builtin_pack_docs("regex").unwrap();
    assert_eq!(regex[0], "^[a-z]+@gmail.com$");
    assert_eq!(regex[1], r"^[a-z]+@gmail\.com$");

    let json = builtin_pack_docs("json").unwrap();
    assert_eq!(json[0], r#"{"name":"alice","age":23}"#);

    let sql = builtin_pack_docs("sql_snippets").unwrap();
    assert_eq!(sql[0], "SELECT id FROM users WHERE active=9;");

    let abc = builtin_pack_docs("abc_music").unwrap();
    assert_eq!(abc[0], "X:1 K:C |CDEF|DEFG|CDEF|DEFG|");
}

#[test]
fn test_packs_are_deterministic() {
    for pack_id in BUILTIN_PACK_IDS {
        assert_eq!(builtin_pack_docs(pack_id).unwrap(), builtin_pack_docs(pack_id).unwrap());
    }
}

#[test]
fn test_unknown_pack() {
    assert_err!(builtin_pack_docs("poetry"), DataError::UnknownPack("poetry"));
}

#[test]
fn test_pack_descriptors() {
    let descriptors = pack_descriptors().unwrap();
    let ids: Vec<&str> = descriptors.iter().map(|d| d.pack_id.as_str()).collect();
    assert_eq!(ids, BUILTIN_PACK_IDS);

    let arithmetic = &descriptors[4];
    assert_eq!(arithmetic.title, "Arithmetic");
    assert_eq!(arithmetic.document_count, PACK_TARGET_LINES);
    let docs = builtin_pack_docs("arithmetic").unwrap();
    assert_eq!(arithmetic.character_count, docs.join("\n").chars().count());

    let json = serde_json::to_value(&descriptors[0]).unwrap();
    assert_eq!(json["title"], "Regex Patterns");
    assert_eq!(json["document_count"], 60);
}
