//! Tokens, the tokenizer and the tagger seam.
//!
//! The money grammar only ever reads tokens. Producing them is split in two
//! steps: [`tokenize`] cuts raw text into digit runs, words and punctuation
//! (using the pest grammar in `tokenizer.pest`), and a [`Tagger`] supplies the
//! lemma and grammatical tags for each piece. Any morphological analyser can be
//! plugged in through the trait; [`DictionaryTagger`] is a table-driven one
//! that ships with the inflected forms the currency lexicon needs.

use pest::Parser;
use pest_derive::Parser;

use std::collections::HashMap;
use std::fs;
use std::hash::BuildHasherDefault;
use std::ops::Range;
use std::path::Path;

use seahash::SeaHasher;
use tracing::debug;

use crate::error::{KopeckError, Result};

pub type FormHasher = BuildHasherDefault<SeaHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of ASCII digits.
    Int,
    Word,
    Punct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    lemma: String,
    tags: Vec<String>,
    kind: TokenKind,
    bytes: Range<usize>,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        let text = text.into();
        let len = text.len();
        Self {
            lemma: text.to_lowercase(),
            text,
            tags: Vec::new(),
            kind,
            bytes: 0..len,
        }
    }
    pub fn with_analysis(mut self, analysis: Analysis) -> Self {
        self.lemma = analysis.lemma;
        self.tags = analysis.tags;
        self
    }
    pub fn with_bytes(mut self, bytes: Range<usize>) -> Self {
        self.bytes = bytes;
        self
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn lemma(&self) -> &str {
        &self.lemma
    }
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
    pub fn kind(&self) -> TokenKind {
        self.kind
    }
    /// Byte offsets of the token in the text it was cut from.
    pub fn bytes(&self) -> Range<usize> {
        self.bytes.clone()
    }
}

#[derive(Parser)]
#[grammar = "tokenizer.pest"]
struct TextParser;

/// Cuts text into untagged tokens; every lemma is the lowercased surface form.
///
/// The grammar accepts any input: a character that is neither whitespace nor
/// part of a digit run or word becomes a one character `Punct` token. The
/// `Tokenize` error is only what pest's `Result` is mapped to.
pub fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut pairs = TextParser::parse(Rule::text, text)
        .map_err(|e| KopeckError::Tokenize(e.to_string()))?;
    let mut tokens = Vec::new();
    if let Some(root) = pairs.next() {
        for pair in root.into_inner() {
            let kind = match pair.as_rule() {
                Rule::int => TokenKind::Int,
                Rule::word => TokenKind::Word,
                Rule::punct => TokenKind::Punct,
                _ => continue,
            };
            let span = pair.as_span();
            tokens.push(Token::new(pair.as_str(), kind).with_bytes(span.start()..span.end()));
        }
    }
    Ok(tokens)
}

/// Lemma and grammatical tags of a single surface form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analysis {
    pub lemma: String,
    pub tags: Vec<String>,
}

pub trait Tagger: Send + Sync {
    fn analyze(&self, text: &str, kind: TokenKind) -> Analysis;

    fn tag(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|token| {
                let analysis = self.analyze(token.text(), token.kind());
                token.with_analysis(analysis)
            })
            .collect()
    }
}

/// Looks lowercased surface forms up in a form -> (lemma, tags) table.
#[derive(Debug, Default, Clone)]
pub struct DictionaryTagger {
    forms: HashMap<String, Analysis, FormHasher>,
}

impl DictionaryTagger {
    const BUILTIN: &'static str = include_str!("../data/lemmas.tsv");

    pub fn new() -> Self {
        Self::default()
    }
    /// The embedded dictionary covering the currency lexicon, multiplier
    /// words and numeral words.
    pub fn builtin() -> Result<Self> {
        Self::from_tsv(Self::BUILTIN)
    }
    /// Parses `form<TAB>lemma[<TAB>tag,tag]` lines. Blank lines and lines
    /// starting with `#` are skipped.
    pub fn from_tsv(tsv: &str) -> Result<Self> {
        let mut tagger = Self::new();
        tagger.merge_tsv(tsv)?;
        Ok(tagger)
    }
    pub fn merge_tsv(&mut self, tsv: &str) -> Result<usize> {
        let mut added = 0;
        for (number, line) in tsv.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut columns = line.split('\t');
            let form = columns.next().map(str::trim).unwrap_or_default();
            let lemma = columns.next().map(str::trim).unwrap_or_default();
            if form.is_empty() || lemma.is_empty() {
                return Err(KopeckError::Dictionary {
                    line: number + 1,
                    message: format!("expected form and lemma, found {line:?}"),
                });
            }
            let tags = columns
                .next()
                .map(|tags| {
                    tags.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            if columns.next().is_some() {
                return Err(KopeckError::Dictionary {
                    line: number + 1,
                    message: "too many columns".into(),
                });
            }
            self.insert(form, Analysis { lemma: lemma.to_lowercase(), tags });
            added += 1;
        }
        Ok(added)
    }
    pub fn merge_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let added = self.merge_tsv(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), added, "merged dictionary file");
        Ok(added)
    }
    pub fn insert(&mut self, form: &str, analysis: Analysis) {
        self.forms.insert(form.to_lowercase(), analysis);
    }
    pub fn len(&self) -> usize {
        self.forms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl Tagger for DictionaryTagger {
    fn analyze(&self, text: &str, _kind: TokenKind) -> Analysis {
        let lower = text.to_lowercase();
        match self.forms.get(&lower) {
            Some(analysis) => analysis.clone(),
            None => Analysis { lemma: lower, tags: Vec::new() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(String, TokenKind)> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|t| (t.text().to_string(), t.kind()))
            .collect()
    }

    #[test]
    fn any_input_tokenizes() {
        let text = "\u{0}\u{301}₽€ -- ¢🙂\t\u{7f}«1»\u{200b}";
        let tokens = tokenize(text).unwrap();
        assert!(!tokens.is_empty());
        for token in &tokens {
            assert_eq!(&text[token.bytes()], token.text());
        }
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize(" \n\t ").unwrap().is_empty());
    }

    #[test]
    fn splits_digits_words_and_punctuation() {
        use TokenKind::*;
        assert_eq!(
            kinds("$1.234,5 руб."),
            vec![
                ("$".to_string(), Punct),
                ("1".to_string(), Int),
                (".".to_string(), Punct),
                ("234".to_string(), Int),
                (",".to_string(), Punct),
                ("5".to_string(), Int),
                ("руб".to_string(), Word),
                (".".to_string(), Punct),
            ]
        );
    }

    #[test]
    fn keeps_byte_offsets() {
        let tokens = tokenize("10 евро").unwrap();
        assert_eq!(tokens[1].bytes(), 3..11);
        assert_eq!(&"10 евро"[tokens[1].bytes()], "евро");
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("  \n ").unwrap().is_empty());
    }

    #[test]
    fn dictionary_lookup_is_caseless() {
        let tagger = DictionaryTagger::from_tsv("рублей\tрубль\tNOUN\nпять\tпять\tNUMR\n").unwrap();
        let analysis = tagger.analyze("Рублей", TokenKind::Word);
        assert_eq!(analysis.lemma, "рубль");
        assert_eq!(analysis.tags, vec!["NOUN".to_string()]);
        assert_eq!(tagger.analyze("Дом", TokenKind::Word).lemma, "дом");
    }

    #[test]
    fn malformed_dictionary_line_is_reported() {
        let err = DictionaryTagger::from_tsv("# comment\nрублей\n").unwrap_err();
        assert!(matches!(err, KopeckError::Dictionary { line: 2, .. }));
    }

    #[test]
    fn builtin_dictionary_loads() {
        let tagger = DictionaryTagger::builtin().unwrap();
        assert_eq!(tagger.analyze("долларов", TokenKind::Word).lemma, "доллар");
        assert!(tagger.analyze("пять", TokenKind::Word).tags.contains(&"NUMR".to_string()));
    }
}
