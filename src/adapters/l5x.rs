//! L5X (Studio 5000 XML project) tag database.
//!
//! Alias tags live in `Tags` collections at controller scope and inside each
//! `Program`:
//!
//! ```xml
//! <Controller Name="PLC01">
//!   <Tags>
//!     <Tag Name="iFT101" TagType="Alias" AliasFor="RIO1:3:I.Data.5">
//!       <Description><![CDATA[Flow]]></Description>
//!     </Tag>
//!   </Tags>
//!   <Programs><Program Name="Main"><Tags>...</Tags></Program></Programs>
//! </Controller>
//! ```
//!
//! The document is streamed; only one tag is held in memory at a time.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::domain::point::TagRecord;
use crate::error::SourceError;
use crate::ports::source::TagSource;

#[derive(Debug, Clone)]
pub struct L5xTagSource {
    path: PathBuf,
}

impl L5xTagSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TagSource for L5xTagSource {
    type Records = L5xRecords<BufReader<File>>;

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn produce(self) -> Result<Self::Records, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(L5xRecords::from_reader(BufReader::new(file)))
    }
}

/// Attributes of one `<Tag>` element.
#[derive(Debug, Default)]
struct TagHeader {
    name: Option<String>,
    alias_for: Option<String>,
}

impl TagHeader {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, String> {
        let mut header = TagHeader::default();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| err.to_string())?;
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            let value = value.trim();
            match attr.key.as_ref() {
                b"Name" if !value.is_empty() => header.name = Some(value.to_string()),
                b"AliasFor" if !value.is_empty() => header.alias_for = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(header)
    }
}

/// Description text of one tag, or why it could not be read.
type Description = Result<Option<String>, String>;

enum Step {
    Skip,
    ProgramStart(Option<String>),
    ProgramEnd,
    TagsStart,
    TagsEnd,
    Tag {
        header: Result<TagHeader, String>,
        has_body: bool,
    },
    Eof,
    Failed(SourceError),
}

/// Alias tags of one L5X pass, in document order.
pub struct L5xRecords<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Depth of open `Tags` elements; `Tag` outside of them is ignored.
    tags_depth: usize,
    program: Option<String>,
    done: bool,
}

impl<R: BufRead> L5xRecords<R> {
    pub fn from_reader(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            tags_depth: 0,
            program: None,
            done: false,
        }
    }

    /// Not named `position`: `&mut Self` is an `Iterator` and
    /// `Iterator::position` would win method lookup.
    fn byte_offset(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn next_step(&mut self) -> Step {
        let position = self.byte_offset();
        let step = match self.reader.read_event_into(&mut self.buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"Program" => Step::ProgramStart(program_name(&e)),
                b"Tags" => Step::TagsStart,
                b"Tag" if self.tags_depth > 0 => Step::Tag {
                    header: TagHeader::from_start(&e),
                    has_body: true,
                },
                _ => Step::Skip,
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"Tag" if self.tags_depth > 0 => Step::Tag {
                    header: TagHeader::from_start(&e),
                    has_body: false,
                },
                _ => Step::Skip,
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"Program" => Step::ProgramEnd,
                b"Tags" => Step::TagsEnd,
                _ => Step::Skip,
            },
            Ok(Event::Eof) => Step::Eof,
            Ok(_) => Step::Skip,
            Err(err) => Step::Failed(xml_error(position, err)),
        };
        self.buf.clear();
        step
    }

    /// Read up to the closing `</Tag>` and return the description text, if any.
    /// A description that cannot be unescaped is reported in the inner `Err`;
    /// only broken XML structure fails the outer result.
    fn read_tag_body(&mut self) -> Result<Description, SourceError> {
        let mut depth = 0usize;
        let mut in_description = false;
        let mut description: Option<String> = None;
        let mut unreadable: Option<String> = None;

        loop {
            let position = self.byte_offset();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|err| xml_error(position, err))?;
            match event {
                Event::Start(e) => {
                    if depth == 0 && e.name().as_ref() == b"Description" {
                        in_description = true;
                        description.get_or_insert_with(String::new);
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    if depth == 0 {
                        in_description = false;
                    }
                }
                Event::Text(text) if in_description => match text.unescape() {
                    Ok(text) => description.get_or_insert_with(String::new).push_str(&text),
                    Err(err) => {
                        unreadable.get_or_insert_with(|| format!("byte {position}: {err}"));
                    }
                },
                Event::CData(data) if in_description => {
                    let data = data.into_inner();
                    description
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&data));
                }
                Event::Eof => {
                    return Err(xml_error(position, "unexpected end of file inside <Tag>"));
                }
                _ => {}
            }
            self.buf.clear();
        }
        self.buf.clear();

        if let Some(reason) = unreadable {
            return Ok(Err(reason));
        }
        Ok(Ok(description
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())))
    }

    fn finish_tag(
        &mut self,
        header: Result<TagHeader, String>,
        has_body: bool,
    ) -> Result<Option<TagRecord>, SourceError> {
        let description = if has_body {
            self.read_tag_body()?
        } else {
            Ok(None)
        };

        let header = match header {
            Ok(header) => header,
            Err(reason) => {
                warn!("skipping unreadable tag in {:?}: {}", self.scope_label(), reason);
                return Ok(None);
            }
        };
        let Some(name) = header.name else {
            warn!("skipping tag without Name in {:?}", self.scope_label());
            return Ok(None);
        };
        let Some(alias_for) = header.alias_for else {
            debug!("tag '{}' is not an alias", name);
            return Ok(None);
        };
        let description = match description {
            Ok(description) => description,
            Err(reason) => {
                warn!("skipping tag '{}' with unreadable description: {}", name, reason);
                return Ok(None);
            }
        };

        let record = TagRecord::new(name, alias_for, description);
        Ok(Some(match &self.program {
            Some(program) => record.with_scope(program.clone()),
            None => record,
        }))
    }

    fn scope_label(&self) -> &str {
        self.program.as_deref().unwrap_or("controller")
    }
}

impl<R: BufRead> Iterator for L5xRecords<R> {
    type Item = Result<TagRecord, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.next_step() {
                Step::Skip => {}
                Step::ProgramStart(name) => self.program = name,
                Step::ProgramEnd => self.program = None,
                Step::TagsStart => self.tags_depth += 1,
                Step::TagsEnd => self.tags_depth = self.tags_depth.saturating_sub(1),
                Step::Tag { header, has_body } => match self.finish_tag(header, has_body) {
                    Ok(Some(record)) => return Some(Ok(record)),
                    Ok(None) => {}
                    Err(err) => {
                        self.done = true;
                        return Some(Err(err));
                    }
                },
                Step::Eof => self.done = true,
                Step::Failed(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

fn program_name(start: &BytesStart<'_>) -> Option<String> {
    start
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"Name")
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

fn xml_error(position: u64, err: impl Display) -> SourceError {
    SourceError::Xml {
        position,
        message: err.to_string(),
    }
}
