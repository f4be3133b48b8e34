#![forbid(unsafe_code)]

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::MarkovError;

/// Everything one speaker said, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeakerText {
    /// trimmed, lowercase speaker name
    pub name: String,
    /// dialogue blocks, each preceded by a single space
    pub text: String,
    /// number of dialogue blocks joined into `text`
    pub lines: usize,
}

impl SpeakerText {
    fn new(name: &str) -> Self {
        Self { name: name.to_string(), text: String::new(), lines: 0 }
    }

    fn append(&mut self, block: &str) {
        self.text.push(' ');
        self.text.push_str(block);
        self.lines += 1;
    }
}

/// A lowercase transcript grouped by speaker, in first-seen order.
///
/// A line starting with `>` names the speaker of the lines below it, up to
/// the next tag. Lines before the first tag belong to nobody.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    speakers: Vec<SpeakerText>,
}

impl Transcript {
    /// Read and parse a transcript file.
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD, which the tokenizer
    /// treats as a separator.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MarkovError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MarkovError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = raw {
            warn!(path = %path.display(), "transcript is not valid UTF-8, replacing bad bytes");
        }
        let transcript = Self::parse(&raw);
        info!(speakers = transcript.len(), "indexed transcript");
        Ok(transcript)
    }

    /// Lowercase `raw` and group its tagged blocks by speaker.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let mut speakers: Vec<SpeakerText> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();

        let mut lines = lowered.lines().peekable();
        while let Some(line) = lines.next() {
            let Some(tag) = line.strip_prefix('>') else {
                continue;
            };
            let mut block: Vec<&str> = Vec::new();
            while let Some(next) = lines.next_if(|l| !l.starts_with('>')) {
                block.push(next);
            }
            let Some(name) = trim_name(tag) else {
                warn!(tag, "speaker tag without a name, skipping its lines");
                continue;
            };
            let slot = *slots.entry(name.to_string()).or_insert_with(|| {
                speakers.push(SpeakerText::new(name));
                speakers.len() - 1
            });
            if let Some(speaker) = speakers.get_mut(slot) {
                speaker.append(&block.join(" "));
            }
        }

        Self { speakers }
    }

    /// Number of distinct speakers.
    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    /// `true` when no tagged block was found.
    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    /// Speakers in first-seen order.
    pub fn speakers(&self) -> &[SpeakerText] {
        &self.speakers
    }

    /// Text of one speaker.
    pub fn speaker(&self, name: &str) -> Option<&SpeakerText> {
        self.speakers.iter().find(|s| s.name == name)
    }

    /// Give up the grouped speakers.
    pub fn into_speakers(self) -> Vec<SpeakerText> {
        self.speakers
    }
}

/// Strip non-letters from both ends; `None` if nothing is left.
fn trim_name(tag: &str) -> Option<&str> {
    let name = tag.trim_matches(|c: char| !c.is_alphabetic());
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCENE: &str = "\
THE PROLOGUE, spoken by nobody
>ROMEO
Is the day so young?
>BENVOLIO
But new struck nine.
>ROMEO
Ay me! sad hours
seem long.
";

    #[test]
    fn groups_blocks_by_speaker() {
        let transcript = Transcript::parse(SCENE);
        assert_eq!(transcript.len(), 2);
        let romeo = transcript.speaker("romeo").unwrap();
        assert_eq!(romeo.text, " is the day so young? ay me! sad hours seem long.");
        assert_eq!(romeo.lines, 2);
        let names: Vec<&str> = transcript.speakers().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["romeo", "benvolio"]);
    }

    #[test]
    fn names_are_trimmed_of_non_letters() {
        let transcript = Transcript::parse(">  FIRST CITIZEN. \nwe are accounted poor\n");
        assert_eq!(transcript.speakers()[0].name, "first citizen");
    }

    #[test]
    fn nameless_tags_are_skipped() {
        let transcript = Transcript::parse(">...\nlost line\n>NURSE\nanon!\n");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.speakers()[0].text, " anon!");
    }

    #[test]
    fn untagged_text_is_empty() {
        assert!(Transcript::parse("just prose\nwithout tags").is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b">NURSE\ngood\xff night\n").unwrap();
        let transcript = Transcript::load(file.path()).unwrap();
        assert_eq!(transcript.speakers()[0].text, " good\u{fffd} night");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Transcript::load("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, MarkovError::Io { .. }));
    }
}
