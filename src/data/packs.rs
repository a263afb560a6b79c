//! 内置语料包
//!
//! 每个语料包由确定性的模板生成，去重后截取前 [`PACK_TARGET_LINES`] 行，
//! 无需随仓库分发文本文件。

use super::error::DataError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 每个语料包的文档数
pub const PACK_TARGET_LINES: usize = 60;

/// 内置语料包 id（展示顺序）
pub const BUILTIN_PACK_IDS: [&str; 6] = [
    "regex",
    "abc_music",
    "chess_pgn",
    "sql_snippets",
    "arithmetic",
    "json",
];

/// 语料包概要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDescriptor {
    pub pack_id: String,
    pub title: String,
    pub description: String,
    pub document_count: usize,
    pub character_count: usize,
}

/// (标题, 描述)
fn pack_metadata(pack_id: &str) -> Option<(&'static str, &'static str)> {
    let meta = match pack_id {
        "regex" => ("Regex Patterns", "Common practical regular expression snippets."),
        "abc_music" => ("ABC Music", "Small melodic snippets in ABC notation."),
        "chess_pgn" => ("Chess PGN", "Short opening and tactical move sequences."),
        "sql_snippets" => ("SQL Snippets", "Short query patterns and clauses."),
        "arithmetic" => ("Arithmetic", "Digit-level addition and subtraction templates."),
        "json" => ("JSON Objects", "Small fixed-schema JSON lines with typed fields."),
        _ => return None,
    };
    Some(meta)
}

/// 内置语料包的文档列表
pub fn builtin_pack_docs(pack_id: &str) -> Result<Vec<String>, DataError> {
    match pack_id {
        "regex" => generate_regex(),
        "abc_music" => generate_abc_music(),
        "chess_pgn" => generate_chess_pgn(),
        "sql_snippets" => generate_sql_snippets(),
        "arithmetic" => generate_arithmetic(),
        "json" => generate_json(),
        other => Err(DataError::UnknownPack(other.to_string())),
    }
}

/// 全部内置语料包的概要
pub fn pack_descriptors() -> Result<Vec<PackDescriptor>, DataError> {
    BUILTIN_PACK_IDS
        .iter()
        .map(|&pack_id| {
            let docs = builtin_pack_docs(pack_id)?;
            let (title, description) =
                pack_metadata(pack_id).ok_or_else(|| DataError::UnknownPack(pack_id.to_string()))?;
            Ok(PackDescriptor {
                pack_id: pack_id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                document_count: docs.len(),
                character_count: docs.join("\n").chars().count(),
            })
        })
        .collect()
}

/// 保序去重并截取前 `PACK_TARGET_LINES` 行
fn ensure_size(pack: &'static str, rows: Vec<String>) -> Result<Vec<String>, DataError> {
    let mut seen = HashSet::new();
    let unique: Vec<String> = rows.into_iter().filter(|row| seen.insert(row.clone())).collect();
    if unique.len() < PACK_TARGET_LINES {
        return Err(DataError::PackTooSmall {
            pack,
            expected: PACK_TARGET_LINES,
            got: unique.len(),
        });
    }
    Ok(unique.into_iter().take(PACK_TARGET_LINES).collect())
}

// ========== 各语料包的生成模板 ==========

fn generate_arithmetic() -> Result<Vec<String>, DataError> {
    let pairs = || (0..10).flat_map(|a| (0..10).map(move |b| (a, b)));
    let add_no_carry = pairs()
        .filter(|(a, b)| a + b < 10)
        .take(20)
        .map(|(a, b)| format!("{a}+{b}={}", a + b));
    let add_carry = pairs()
        .filter(|(a, b)| a + b >= 10)
        .take(20)
        .map(|(a, b)| format!("{a}+{b}={}", a + b));
    let sub_rows = (0..10)
        .flat_map(|a| (0..=a).map(move |b| (a, b)))
        .take(20)
        .map(|(a, b)| format!("{a}-{b}={}", a - b));

    ensure_size("arithmetic", add_no_carry.chain(add_carry).chain(sub_rows).collect())
}

type Opening = (&'static str, &'static str);

fn generate_chess_pgn() -> Result<Vec<String>, DataError> {
    // (第一步, [(第二步, [第三步...])...])
    let families: [(Opening, &[(Opening, &[Opening])]); 4] = [
        (
            ("e4", "e5"),
            &[
                (("Nf3", "Nc6"), &[("Bb5", "a6"), ("Bc4", "Bc5"), ("d4", "exd4"), ("c3", "Nf6")]),
                (("Nf3", "Nf6"), &[("Nxe5", "d6"), ("d4", "d6"), ("Nc3", "Nc6"), ("g3", "g6")]),
                (("Nc3", "Nc6"), &[("Nf3", "Nf6"), ("Bc4", "Bc5"), ("Bb5", "Nd4"), ("f4", "exf4")]),
                (("Bc4", "Bc5"), &[("Nf3", "Nc6"), ("c3", "Nf6"), ("d3", "d6"), ("Qh5", "Qe7")]),
                (("d4", "exd4"), &[("Nf3", "Nc6"), ("c3", "d5"), ("Bc4", "Bb4+"), ("Qxd4", "Nc6")]),
            ],
        ),
        (
            ("d4", "d5"),
            &[
                (("c4", "e6"), &[("Nc3", "Nf6"), ("Nf3", "Nf6"), ("g3", "Nf6"), ("cxd5", "exd5")]),
                (("c4", "c6"), &[("Nc3", "Nf6"), ("Nf3", "Nf6"), ("e3", "e6"), ("Bf4", "Nf6")]),
                (("Nf3", "Nf6"), &[("c4", "e6"), ("g3", "g6"), ("Bf4", "e6"), ("e3", "e6")]),
                (("Bf4", "Nf6"), &[("e3", "e6"), ("Nf3", "c5"), ("c3", "e6"), ("h3", "c5")]),
                (("g3", "Nf6"), &[("Bg2", "e6"), ("Nf3", "c6"), ("c4", "dxc4"), ("Bg2", "g6")]),
            ],
        ),
        (
            ("e4", "c5"),
            &[
                (("Nf3", "d6"), &[("d4", "cxd4"), ("Bb5+", "Nd7")]),
                (("Nf3", "Nc6"), &[("d4", "cxd4"), ("Bb5", "g6")]),
                (("Nc3", "Nc6"), &[("f4", "g6"), ("Nf3", "g6")]),
                (("c3", "d5"), &[("exd5", "Qxd5"), ("e5", "Nc6")]),
                (("d4", "cxd4"), &[("Nf3", "d6"), ("c3", "Nf6")]),
            ],
        ),
        (
            ("e4", "c6"),
            &[
                (("d4", "d5"), &[("Nc3", "dxe4"), ("Nd2", "dxe4")]),
                (("Nc3", "d5"), &[("Nf3", "dxe4"), ("d4", "dxe4")]),
                (("Nf3", "d5"), &[("Nc3", "dxe4"), ("e5", "Bf5")]),
                (("d3", "d5"), &[("Nd2", "dxe4"), ("Nf3", "Bg4")]),
                (("c4", "d5"), &[("exd5", "cxd5"), ("cxd5", "Nf6")]),
            ],
        ),
    ];

    let mut rows = Vec::new();
    for ((w1, b1), seconds) in families {
        for &((w2, b2), thirds) in seconds {
            for &(w3, b3) in thirds {
                rows.push(format!("1. {w1} {b1} 2. {w2} {b2} 3. {w3} {b3}"));
            }
        }
    }
    ensure_size("chess_pgn", rows)
}

fn generate_abc_music() -> Result<Vec<String>, DataError> {
    const KEYS: [&str; 5] = ["C", "G", "D", "F", "A"];
    const SCALAR: [&str; 10] = ["CDEF", "DEFG", "EFGA", "FGAB", "GABC", "ABCD", "BCDE", "DCBA", "EDCB", "FEDC"];
    const ARPEGGIO: [&str; 10] = ["CEGC", "DFAF", "EGBE", "FACE", "GBDG", "ACEA", "BDFB", "CEAC", "DFAD", "EGBD"];
    const ALTERNATING: [&str; 10] = ["CDCD", "EFEF", "GAGA", "BGBG", "ACAC", "DFDF", "EAEA", "FGFG", "ABAB", "BCBC"];

    let mut rows = Vec::with_capacity(PACK_TARGET_LINES);
    for i in 0..20 {
        let (m1, m2) = (SCALAR[i % 10], SCALAR[(i + 1) % 10]);
        rows.push(format!("X:{} K:{} |{m1}|{m2}|{m1}|{m2}|", i + 1, KEYS[i % 5]));
    }
    for i in 0..20 {
        let (m1, m2) = (ARPEGGIO[i % 10], ARPEGGIO[(i + 2) % 10]);
        rows.push(format!("X:{} K:{} |{m1}|{m1}|{m2}|{m2}|", i + 21, KEYS[i % 5]));
    }
    for i in 0..20 {
        let (m1, m2) = (ALTERNATING[i % 10], ALTERNATING[(i + 3) % 10]);
        rows.push(format!("X:{} K:{} |{m1}|{m2}|{m1}|{m2}|", i + 41, KEYS[i % 5]));
    }
    ensure_size("abc_music", rows)
}

fn generate_sql_snippets() -> Result<Vec<String>, DataError> {
    const TABLES: [&str; 4] = ["users", "orders", "products", "sessions"];
    const COLS: [&str; 8] = ["id", "name", "email", "total", "stock", "status", "age", "score"];
    const FIELDS: [&str; 7] = ["active", "status", "stock", "age", "score", "total", "valid"];
    const OPS: [&str; 5] = ["=", ">", ">=", "<", "<="];

    let mut rows = Vec::with_capacity(PACK_TARGET_LINES);
    for (t_idx, table) in TABLES.iter().enumerate() {
        for i in 0..15 {
            let col = COLS[(i + t_idx) % COLS.len()];
            let field = FIELDS[(i + 2 * t_idx) % FIELDS.len()];
            let op = OPS[i % OPS.len()];
            let value = (t_idx * 53 + i * 17 + 9) % 201;
            rows.push(format!("SELECT {col} FROM {table} WHERE {field}{op}{value};"));
        }
    }
    ensure_size("sql_snippets", rows)
}

fn generate_regex() -> Result<Vec<String>, DataError> {
    const CHARCLASSES: [&str; 5] = ["[a-z]", "[a-z0-9]", "[A-Z]", "[A-Za-z]", "[A-Za-z0-9]"];
    const DOMAINS: [&str; 6] = ["gmail.com", "yahoo.com", "outlook.com", "company.org", "school.edu", "proton.me"];

    let mut rows = Vec::with_capacity(PACK_TARGET_LINES);
    for charclass in CHARCLASSES {
        for domain in DOMAINS {
            rows.push(format!("^{charclass}+@{domain}$"));
            rows.push(format!("^{charclass}+@{}$", domain.replace('.', r"\.")));
        }
    }
    ensure_size("regex", rows)
}

fn generate_json() -> Result<Vec<String>, DataError> {
    const KEY_PAIRS: [(&str, &str); 5] = [
        ("name", "age"),
        ("city", "pop"),
        ("item", "price"),
        ("team", "rank"),
        ("model", "score"),
    ];
    const VALUES: [&str; 20] = [
        "alice", "bob", "carol", "dave", "eve", "rome", "oslo", "delhi", "book", "pen", "lamp", "chair",
        "falcon", "otter", "nova", "zen", "atlas", "pixel", "orbit", "delta",
    ];

    let mut rows = Vec::with_capacity(PACK_TARGET_LINES);
    for (p_idx, (k1, k2)) in KEY_PAIRS.iter().enumerate() {
        for i in 0..12 {
            let value = VALUES[(p_idx * 7 + i) % VALUES.len()];
            let number = (p_idx * 137 + i * 17 + 23) % 1000;
            rows.push(format!(r#"{{"{k1}":"{value}","{k2}":{number}}}"#));
        }
    }
    ensure_size("json", rows)
}
