use std::{ffi::OsStr, path::PathBuf};

use clap::{
    builder::{PathBufValueParser, TypedValueParser, ValueParserFactory},
    error::ErrorKind,
};
use libumccrise::utils;

/// bcbio project directory, checked to exist and made absolute when the
/// command line is parsed.
#[derive(Clone, Debug)]
pub struct ProjectPath(PathBuf);

impl From<ProjectPath> for PathBuf {
    fn from(path: ProjectPath) -> Self {
        path.0
    }
}

impl ValueParserFactory for ProjectPath {
    type Parser = ProjectPathParser;
    fn value_parser() -> Self::Parser {
        ProjectPathParser
    }
}

#[derive(Clone)]
pub struct ProjectPathParser;

impl TypedValueParser for ProjectPathParser {
    type Value = ProjectPath;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let path = PathBufValueParser::new().parse_ref(cmd, arg, value)?;
        if !path.exists() {
            return Err(clap::Error::raw(
                ErrorKind::ValueValidation,
                format!("Project {value:?} does not exist\n"),
            )
            .with_cmd(cmd));
        }
        let path = utils::absolute(path)
            .map_err(|e| clap::Error::raw(ErrorKind::Io, format!("{e}\n")).with_cmd(cmd))?;
        Ok(ProjectPath(path))
    }
}
