use crate::{
    lang::{code::ScriptWord, source_buffer::SourceLocation},
    runtime::built_ins::Builtin,
};
use std::{
    collections::HashMap,
    fmt::{self, Display, Formatter},
    rc::Rc,
};

/// What a dictionary name resolves to.
#[derive(Clone, Debug)]
pub enum WordKind {
    /// A primitive implemented in Rust.
    Builtin(Builtin),

    /// A colon definition.
    Scripted(Rc<ScriptWord>),

    /// A variable, evaluating it pushes the address of its cell.
    Variable(usize),

    /// A constant, evaluating it pushes the value.
    Constant(i64),
}

/// The information stored in the dictionary for each word.
#[derive(Clone, Debug)]
pub struct WordInfo {
    /// The location in the source code where the word was defined.
    pub location: SourceLocation,

    /// The name of the word, upper case.
    pub name: String,

    /// What the word does.
    pub kind: WordKind,

    /// A simple description of the word.
    pub description: String,

    /// The stack signature of the word.
    pub signature: String,
}

impl WordInfo {
    /// Create a new WordInfo with an empty description and signature.
    pub fn new(location: SourceLocation, name: String, kind: WordKind) -> WordInfo {
        WordInfo {
            location,
            name,
            kind,
            description: String::new(),
            signature: String::new(),
        }
    }
}

/// The word dictionary.  Names are unique, inserting a name again replaces the earlier entry so the
/// latest definition wins for every later lookup.
///
/// Variables and constants share the one name space with the words.
pub struct Dictionary {
    words: HashMap<String, WordInfo>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

/// List the words sorted by name along with their descriptions.
impl Display for Dictionary {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        let max_size = self.words.keys().map(|name| name.len()).max().unwrap_or(0);

        writeln!(formatter, "{} words defined.\n", self.words.len())?;

        for name in self.names() {
            let word = &self.words[&name];
            writeln!(formatter, "{:width$}  --  {}", name, word.description, width = max_size)?;
        }

        Ok(())
    }
}

impl Dictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Dictionary {
        Dictionary {
            words: HashMap::new(),
        }
    }

    /// Insert a word, replacing any word of the same name.
    pub fn insert(&mut self, info: WordInfo) {
        let _ = self.words.insert(info.name.clone(), info);
    }

    /// Find a word by name.  The name is expected to already be upper case.
    pub fn try_get(&self, name: &str) -> Option<&WordInfo> {
        self.words.get(name)
    }

    /// All of the word names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.words.keys().cloned().collect();

        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(name: &str, value: i64) -> WordInfo {
        WordInfo::new(SourceLocation::new(), name.to_string(), WordKind::Constant(value))
    }

    #[test]
    fn latest_definition_wins() {
        let mut dictionary = Dictionary::new();

        dictionary.insert(constant("THREE", 3));
        dictionary.insert(WordInfo::new(
            SourceLocation::new(),
            "THREE".to_string(),
            WordKind::Variable(7),
        ));

        assert_eq!(dictionary.len(), 1);
        assert!(matches!(
            dictionary.try_get("THREE").map(|word| &word.kind),
            Some(WordKind::Variable(7))
        ));
    }

    #[test]
    fn names_are_sorted() {
        let mut dictionary = Dictionary::new();

        dictionary.insert(constant("B", 1));
        dictionary.insert(constant("A", 2));

        assert_eq!(dictionary.names(), vec!["A".to_string(), "B".to_string()]);
    }
}
