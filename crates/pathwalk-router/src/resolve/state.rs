//! Accumulated resolution state
//!
//! Threaded through the per-segment transitions by value: each descent
//! produces the next state, nothing is mutated in place.

use crate::param::ParamValue;
use crate::path::parent;

use super::ResolutionResult;

/// How the state reached its current directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Descent {
    Directory,
    Parameter,
}

/// File that concluded resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedFile {
    pub(crate) filename: String,
    pub(crate) extension: Option<String>,
}

impl ResolvedFile {
    pub(crate) fn new(filename: String) -> Self {
        Self {
            filename,
            extension: None,
        }
    }

    pub(crate) fn with_extension(mut self, extension: &str) -> Self {
        self.extension = Some(extension.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ResolveState {
    /// Disk-literal directory path below the document root
    translate_directory: String,
    /// Same directories as seen in the request (parameter segments verbatim)
    script_name: String,
    parameters: Vec<ParamValue>,
    last_descent: Option<Descent>,
}

impl ResolveState {
    pub(crate) fn translate_directory(&self) -> &str {
        &self.translate_directory
    }

    pub(crate) fn script_name(&self) -> &str {
        &self.script_name
    }

    pub(crate) fn parameters(&self) -> &[ParamValue] {
        &self.parameters
    }

    /// Descends into a real subdirectory
    pub(crate) fn with_directory(mut self, name: &str) -> Self {
        self.push(name, name);
        self.last_descent = Some(Descent::Directory);
        self
    }

    /// Descends into a parameter directory, recording `value`
    ///
    /// `directory` is the literal name on disk, `segment` the request text.
    pub(crate) fn with_parameter(mut self, directory: &str, segment: &str, value: ParamValue) -> Self {
        self.push(directory, segment);
        self.parameters.push(value);
        self.last_descent = Some(Descent::Parameter);
        self
    }

    /// Steps back out of the parameter directory entered last
    ///
    /// Parameters already extracted are kept. Returns `None` unless the
    /// most recent descent was into a parameter directory.
    pub(crate) fn leave_parameter_directory(&self) -> Option<Self> {
        if self.last_descent != Some(Descent::Parameter) {
            return None;
        }

        Some(Self {
            translate_directory: parent(&self.translate_directory)?.to_string(),
            script_name: parent(&self.script_name)?.to_string(),
            parameters: self.parameters.clone(),
            last_descent: None,
        })
    }

    /// Concludes resolution at `file`, found at segment `terminal`
    ///
    /// Every segment after `terminal` becomes path info.
    pub(crate) fn into_result(
        self,
        file: ResolvedFile,
        terminal: usize,
        segments: &[&str],
    ) -> ResolutionResult {
        let path_info: String = segments
            .iter()
            .skip(terminal + 1)
            .map(|segment| format!("/{}", segment))
            .collect();

        ResolutionResult {
            script_name: format!("{}/{}", self.script_name, file.filename),
            translate_directory: self.translate_directory,
            filename: file.filename,
            path_info,
            extension: file.extension,
            parameters: self.parameters,
        }
    }

    fn push(&mut self, directory: &str, segment: &str) {
        self.translate_directory.push('/');
        self.translate_directory.push_str(directory);
        self.script_name.push('/');
        self.script_name.push_str(segment);
    }
}
