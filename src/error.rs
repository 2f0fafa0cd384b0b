use std::path::PathBuf;
use thiserror::Error;

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure taxonomy for the pipeline. Components propagate these through
/// `anyhow::Result`, so the variants stay downcastable at the top level.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A raw file or the schema could not be read during validation.
    #[error("unreadable input {path} during validation")]
    ValidationInput {
        path: PathBuf,
        #[source]
        source: BoxedCause,
    },

    /// Batch validation routed zero files to the validated directory.
    #[error("no data could be validated, pipeline stopped")]
    NoValidData,

    /// A routing destination already holds a file with the same name.
    #[error("destination {dest} already contains a file named {name}")]
    RoutingCollision { name: String, dest: PathBuf },

    /// Merge, clean, split, scale or artifact persistence failed.
    #[error("data transformation failed: {context}")]
    Transformation {
        context: String,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl PipelineError {
    pub fn validation_input(path: impl Into<PathBuf>, source: anyhow::Error) -> Self {
        Self::ValidationInput {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn transformation(context: impl Into<String>) -> Self {
        Self::Transformation {
            context: context.into(),
            source: None,
        }
    }

    pub fn transformation_with(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Transformation {
            context: context.into(),
            source: Some(source.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transformation_carries_cause() {
        let cause = anyhow::anyhow!("disk full");
        let err = PipelineError::transformation_with("saving scaler", cause);
        assert!(err.to_string().contains("saving scaler"));
        let source = std::error::Error::source(&err).expect("cause attached");
        assert!(source.to_string().contains("disk full"));
    }

    #[test]
    fn no_valid_data_is_downcastable_through_anyhow() {
        let err: anyhow::Error = PipelineError::NoValidData.into();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::NoValidData)
        ));
    }
}
