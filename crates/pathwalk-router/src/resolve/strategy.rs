//! Per-segment match strategies
//!
//! Evaluated in [`STRATEGIES`] order; the first one that does not
//! [`Step::Skip`] decides the segment.

use crate::config::ResolutionConfig;
use crate::error::RouteError;
use crate::param::{match_parameter_directory, ParamMatch, ParamValue};
use crate::probe::{find_file, is_directory, FileSystem};

use super::state::{ResolveState, ResolvedFile};

/// Outcome of one strategy for one segment
#[derive(Debug)]
pub(crate) enum Step {
    /// Move into a directory; carries the next state
    Descend(ResolveState),
    /// Consume the segment without moving
    Stay,
    /// The segment names the file that ends resolution
    Terminate(ResolvedFile),
    /// Not applicable, try the next strategy
    Skip,
}

/// Everything a strategy may consult for one segment
pub(crate) struct SegmentContext<'c> {
    pub(crate) fs: &'c dyn FileSystem,
    pub(crate) config: &'c ResolutionConfig,
    pub(crate) request_path: &'c str,
    pub(crate) state: &'c ResolveState,
    /// Absolute directory the segment is looked up in
    pub(crate) directory: String,
    pub(crate) segment: &'c str,
}

pub(crate) type Strategy = fn(&SegmentContext<'_>) -> Result<Step, RouteError>;

pub(crate) const STRATEGIES: &[(&str, Strategy)] = &[
    ("exact_file", exact_file),
    ("substituted_extension", substituted_extension),
    ("empty_segment", empty_segment),
    ("directory", directory),
    ("file", file),
    ("fixed_parameter_directory", fixed_parameter_directory),
    ("delimited_parameter_directory", delimited_parameter_directory),
];

/// A dotted segment naming an existing file verbatim
fn exact_file(ctx: &SegmentContext<'_>) -> Result<Step, RouteError> {
    if !ctx.segment.contains('.') {
        return Ok(Step::Skip);
    }

    Ok(find_file(ctx.fs, &ctx.directory, ctx.segment, &[])?
        .map_or(Step::Skip, |filename| Step::Terminate(ResolvedFile::new(filename))))
}

/// `name.ext` served by `name.<search extension>` when `ext` is not searched itself
fn substituted_extension(ctx: &SegmentContext<'_>) -> Result<Step, RouteError> {
    let Some((base_name, extension)) = ctx.segment.rsplit_once('.') else {
        return Ok(Step::Skip);
    };

    let searched = &ctx.config.search_extensions;
    if searched.is_empty() || searched.iter().any(|e| e == extension) {
        return Ok(Step::Skip);
    }

    Ok(find_file(ctx.fs, &ctx.directory, base_name, searched)?.map_or(Step::Skip, |filename| {
        Step::Terminate(ResolvedFile::new(filename).with_extension(extension))
    }))
}

/// Doubled or trailing `/`
fn empty_segment(ctx: &SegmentContext<'_>) -> Result<Step, RouteError> {
    Ok(if ctx.segment.is_empty() {
        Step::Stay
    } else {
        Step::Skip
    })
}

fn directory(ctx: &SegmentContext<'_>) -> Result<Step, RouteError> {
    Ok(if is_directory(ctx.fs, &ctx.directory, ctx.segment)? {
        Step::Descend(ctx.state.clone().with_directory(ctx.segment))
    } else {
        Step::Skip
    })
}

fn file(ctx: &SegmentContext<'_>) -> Result<Step, RouteError> {
    let found = find_file(ctx.fs, &ctx.directory, ctx.segment, &ctx.config.search_extensions)?;
    Ok(found.map_or(Step::Skip, |filename| Step::Terminate(ResolvedFile::new(filename))))
}

/// The fixed-name parameter directory accepts any segment unvalidated
fn fixed_parameter_directory(ctx: &SegmentContext<'_>) -> Result<Step, RouteError> {
    let Some(name) = ctx.config.parameter_directory_name.as_deref() else {
        return Ok(Step::Skip);
    };

    Ok(if is_directory(ctx.fs, &ctx.directory, name)? {
        Step::Descend(ctx.state.clone().with_parameter(
            name,
            ctx.segment,
            ParamValue::from(ctx.segment),
        ))
    } else {
        Step::Skip
    })
}

fn delimited_parameter_directory(ctx: &SegmentContext<'_>) -> Result<Step, RouteError> {
    let Some((left, right)) = ctx.config.delimiters() else {
        return Ok(Step::Skip);
    };

    let matched = match_parameter_directory(
        ctx.fs,
        &ctx.directory,
        ctx.segment,
        left,
        right,
        &ctx.config.parameter_filters,
    )?;

    match matched {
        ParamMatch::Absent => Ok(Step::Skip),
        ParamMatch::Accepted { value, directory } => Ok(Step::Descend(
            ctx.state.clone().with_parameter(&directory, ctx.segment, value),
        )),
        ParamMatch::Rejected { reason } => Err(RouteError::InvalidParameter {
            segment: ctx.segment.to_string(),
            path: ctx.request_path.to_string(),
            reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MemoryFs;

    fn run(strategy: Strategy, fs: &MemoryFs, config: &ResolutionConfig, segment: &str) -> Step {
        let state = ResolveState::default();
        let ctx = SegmentContext {
            fs,
            config,
            request_path: "/request",
            state: &state,
            directory: "/www".to_string(),
            segment,
        };
        strategy(&ctx).unwrap()
    }

    fn terminated(step: Step) -> Option<ResolvedFile> {
        match step {
            Step::Terminate(file) => Some(file),
            _ => None,
        }
    }

    #[test]
    fn test_exact_file_needs_a_dot() {
        let fs = MemoryFs::new().with_file("/www/README").with_file("/www/a.txt");
        let config = ResolutionConfig::new("/www");

        assert!(matches!(run(exact_file, &fs, &config, "README"), Step::Skip));
        assert_eq!(
            terminated(run(exact_file, &fs, &config, "a.txt")).unwrap().filename,
            "a.txt"
        );
    }

    #[test]
    fn test_substituted_extension_records_requested_suffix() {
        let fs = MemoryFs::new().with_file("/www/detail.php");
        let config = ResolutionConfig::new("/www");

        let file = terminated(run(substituted_extension, &fs, &config, "detail.json")).unwrap();
        assert_eq!(file.filename, "detail.php");
        assert_eq!(file.extension.as_deref(), Some("json"));
    }

    #[test]
    fn test_substituted_extension_skips_searched_suffix() {
        let fs = MemoryFs::new().with_file("/www/detail.php");
        let config = ResolutionConfig::new("/www").with_search_extensions(["php", "json"]);
        assert!(matches!(
            run(substituted_extension, &fs, &config, "detail.json"),
            Step::Skip
        ));

        let config = ResolutionConfig::new("/www").with_search_extensions(Vec::<String>::new());
        assert!(matches!(
            run(substituted_extension, &fs, &config, "detail.json"),
            Step::Skip
        ));
    }

    #[test]
    fn test_fixed_parameter_directory_records_segment() {
        let fs = MemoryFs::new().with_dir("/www/%VAR%");
        let config = ResolutionConfig::new("/www");

        match run(fixed_parameter_directory, &fs, &config, "42") {
            Step::Descend(state) => {
                assert_eq!(state.translate_directory(), "/%VAR%");
                assert_eq!(state.script_name(), "/42");
                assert_eq!(state.parameters(), &[ParamValue::from("42")]);
            }
            other => panic!("unexpected step {:?}", other),
        }

        let config = config.without_parameter_directory();
        assert!(matches!(
            run(fixed_parameter_directory, &fs, &config, "42"),
            Step::Skip
        ));
    }

    #[test]
    fn test_delimited_parameter_directory_rejection_is_an_error() {
        let fs = MemoryFs::new().with_dir("/www/{%digit%}");
        let config = ResolutionConfig::new("/www").with_parameter_delimiters("{%", "%}");
        let state = ResolveState::default();
        let ctx = SegmentContext {
            fs: &fs,
            config: &config,
            request_path: "/abc",
            state: &state,
            directory: "/www".to_string(),
            segment: "abc",
        };

        let err = delimited_parameter_directory(&ctx).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_delimited_parameter_directory_needs_both_delimiters() {
        let fs = MemoryFs::new().with_dir("/www/{%digit%}");
        let config = ResolutionConfig::new("/www");
        assert!(matches!(
            run(delimited_parameter_directory, &fs, &config, "42"),
            Step::Skip
        ));
    }
}
