use crate::assert_err;
use crate::data::{DataError, validate_upload};
use crate::train::config::RUN_LIMITS;

#[test]
fn test_valid_upload_is_trimmed() {
    let text = validate_upload("notes.TXT", b"  hello\nworld \n").unwrap();
    assert_eq!(text, "hello\nworld");
}

#[test]
fn test_extension_must_be_txt() {
    assert_err!(
        validate_upload("data.csv", b"a,b"),
        DataError::UnsupportedExtension { allowed } if allowed == ".txt"
    );
    assert_err!(
        validate_upload("README", b"hello"),
        DataError::UnsupportedExtension { .. }
    );
}

#[test]
fn test_file_too_large() {
    let content = vec![b'a'; RUN_LIMITS.upload_max_bytes + 1];
    assert_err!(validate_upload("big.txt", &content), DataError::FileTooLarge { .. });
}

#[test]
fn test_not_utf8() {
    assert_err!(validate_upload("bad.txt", &[0xff, 0xfe, 0x00]), DataError::NotUtf8);
}

#[test]
fn test_empty_after_trim() {
    assert_err!(validate_upload("empty.txt", b" \n\t "), DataError::EmptyFile);
}

#[test]
fn test_too_many_unique_chars() {
    let text: String = (0..300u32).filter_map(|i| char::from_u32(0x4e00 + i)).collect();
    assert_err!(
        validate_upload("cjk.txt", text.as_bytes()),
        DataError::TooManyUniqueChars { got, max } if *got == 300 && *max == 256
    );
}

#[test]
fn test_blocked_content_is_case_insensitive() {
    assert_err!(
        validate_upload("x.txt", b"select 1; drop database prod;"),
        DataError::BlockedContent(b) if *b == "DROP DATABASE"
    );
    assert_err!(
        validate_upload("x.txt", b"<SCRIPT>alert(1)</script>"),
        DataError::BlockedContent(b) if *b == "<script>"
    );
}

#[test]
fn test_checks_run_in_order() {
    // 扩展名先于 UTF-8 检查
    assert_err!(validate_upload("x.bin", &[0xff]), DataError::UnsupportedExtension { .. });
    // 黑名单先于字符数检查
    let mut content = "rm -rf /\n".to_string();
    content.push_str(&"a".repeat(RUN_LIMITS.corpus_max_chars));
    assert_err!(
        validate_upload("x.txt", content.as_bytes()),
        DataError::BlockedContent(b) if *b == "rm -rf /"
    );
}

#[test]
fn test_corpus_char_limit() {
    let content = "a".repeat(RUN_LIMITS.corpus_max_chars + 1);
    assert_err!(
        validate_upload("long.txt", content.as_bytes()),
        DataError::CorpusTooLarge { .. }
    );
}
