//! Where documents are read from and written to.

use std::{
    convert::Infallible,
    fmt,
    fs::File,
    io::{self, Read, Write},
    path::PathBuf,
    str::FromStr,
};

use crate::error::Result;

/// A file path, or the process's standard streams.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Endpoint {
    /// Standard input when reading, standard output when writing.
    #[default]
    Stdio,
    /// A file on disk.
    Path(PathBuf),
}

impl Endpoint {
    /// Parses a command line path; `-` and the empty string select stdio.
    pub fn parse(path: &str) -> Self {
        match path {
            "" | "-" => Endpoint::Stdio,
            path => Endpoint::Path(PathBuf::from(path)),
        }
    }

    /// Opens the endpoint for reading.
    pub fn open_input(&self) -> Result<Box<dyn Read>> {
        Ok(match self {
            Endpoint::Stdio => Box::new(io::stdin().lock()),
            Endpoint::Path(path) => Box::new(File::open(path)?),
        })
    }

    /// Opens the endpoint for writing, truncating an existing file.
    pub fn open_output(&self) -> Result<Box<dyn Write>> {
        Ok(match self {
            Endpoint::Stdio => Box::new(io::stdout().lock()),
            Endpoint::Path(path) => Box::new(File::create(path)?),
        })
    }

    /// Reads the whole document.
    pub fn read_all(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open_input()?.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl FromStr for Endpoint {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Endpoint::parse(s))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Stdio => f.write_str("-"),
            Endpoint::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
