use std::collections::HashMap;

/// 哨兵 token 的显示文本
pub const BOS_TOKEN: &str = "<BOS>";

/// 字符级词表
///
/// id `0..n` 对应按码点排序的去重字符，id `n` 为 `BOS` 哨兵：既标记序列开头，也是采样时的结束信号。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    chars: Vec<char>,
    index: HashMap<char, usize>,
}

impl Vocabulary {
    pub fn from_docs<S: AsRef<str>>(docs: &[S]) -> Self {
        let mut chars: Vec<char> = docs.iter().flat_map(|d| d.as_ref().chars()).collect();
        chars.sort_unstable();
        chars.dedup();
        let index = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { chars, index }
    }

    /// 字符数（不含 BOS）
    pub fn num_chars(&self) -> usize {
        self.chars.len()
    }

    /// 没有任何字符时视为空词表
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// 词表大小（含 BOS）
    pub fn size(&self) -> usize {
        self.chars.len() + 1
    }

    pub fn bos(&self) -> usize {
        self.chars.len()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_at(&self, id: usize) -> Option<char> {
        self.chars.get(id).copied()
    }

    pub fn id_of(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    /// `[BOS] + 字符 + [BOS]`；不在词表中的字符被跳过
    pub fn encode(&self, doc: &str) -> Vec<usize> {
        let mut tokens = Vec::with_capacity(doc.len() + 2);
        tokens.push(self.bos());
        tokens.extend(doc.chars().filter_map(|c| self.id_of(c)));
        tokens.push(self.bos());
        tokens
    }

    /// 拼接非 BOS token 对应的字符
    pub fn decode(&self, tokens: &[usize]) -> String {
        tokens.iter().filter_map(|&t| self.char_at(t)).collect()
    }

    /// 单个 token 的显示文本（BOS 显示为 `<BOS>`）
    pub fn token_str(&self, id: usize) -> String {
        match self.char_at(id) {
            Some(c) => c.to_string(),
            None => BOS_TOKEN.to_string(),
        }
    }
}
