use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ShaderSourceError;

/// Substring that marks a section header line.
pub const MARKER: &str = "#shader";

/// Vertex and fragment programs extracted from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Unselected,
    Vertex,
    Fragment,
}

impl Section {
    /// Section selected by a marker line; `None` when the line names neither stage.
    fn from_marker(line: &str) -> Option<Self> {
        if line.contains("vertex") {
            Some(Self::Vertex)
        } else if line.contains("fragment") {
            Some(Self::Fragment)
        } else {
            None
        }
    }
}

/// Incremental splitter fed one line at a time.
///
/// Marker lines are consumed. An unrecognised marker keeps the current
/// section. Lines seen before the first recognised marker are dropped.
#[derive(Debug)]
struct Splitter {
    out: ShaderSources,
    section: Section,
}

impl Splitter {
    fn new() -> Self {
        Self { out: ShaderSources::default(), section: Section::Unselected }
    }

    fn feed(&mut self, line: &str) {
        if line.contains(MARKER) {
            if let Some(next) = Section::from_marker(line) {
                self.section = next;
            }
            return;
        }

        let buf = match self.section {
            Section::Unselected => return,
            Section::Vertex => &mut self.out.vertex,
            Section::Fragment => &mut self.out.fragment,
        };
        buf.push_str(line);
        buf.push('\n');
    }

    fn finish(self) -> ShaderSources {
        self.out
    }
}

/// Splits lines into vertex and fragment sections in one forward pass.
pub fn split_lines<I, S>(lines: I) -> ShaderSources
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut splitter = Splitter::new();
    for line in lines {
        splitter.feed(line.as_ref());
    }
    splitter.finish()
}

/// Splits an in-memory source.
pub fn split_str(src: &str) -> ShaderSources {
    split_lines(src.lines())
}

/// Splits a source streamed line by line from `reader`.
///
/// Stops at the first read error, including invalid UTF-8.
pub fn split_reader<R: BufRead>(reader: R) -> Result<ShaderSources, ShaderSourceError> {
    let mut splitter = Splitter::new();
    for line in reader.lines() {
        splitter.feed(&line.map_err(ShaderSourceError::Read)?);
    }
    Ok(splitter.finish())
}

/// Reads and splits the shader file at `path`.
pub fn parse_shader(path: impl AsRef<Path>) -> Result<ShaderSources, ShaderSourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ShaderSourceError::ResourceNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    split_reader(BufReader::new(file))
}
