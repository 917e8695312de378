use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Package builder failures. None of them mutate builder state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("unknown package: {0}")]
    UnknownPackage(String),

    #[error("no package selected")]
    NoPackageSelected,

    #[error("no files provided")]
    EmptyBatch,

    #[error("file {name} is {size_bytes} bytes, limit is {limit_bytes}")]
    FileTooLarge {
        name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },

    #[error("file {name} has unsupported type {mime_type}")]
    UnsupportedType { name: String, mime_type: String },

    #[error("package is full ({max_files} images)")]
    PackageFull { max_files: usize },

    #[error("a crop session is already open")]
    CropSessionActive,

    #[error("no crop session is open")]
    NoActiveCropSession,

    #[error("confirmation required: {pending} image(s) would be discarded")]
    ConfirmationRequired { pending: usize },

    #[error("no staged images")]
    NothingStaged,

    #[error("expected {expected} image urls, got {actual}")]
    UrlCountMismatch { expected: usize, actual: usize },
}

/// Failures while turning staged images into a cart item.
///
/// Staged images are kept on every variant so the customer can retry
/// without cropping again.
#[derive(Debug, Error)]
pub enum FinalizeError {
    #[error(transparent)]
    Builder(#[from] BuilderError),

    #[error("upload of image {index} failed")]
    UploadFailed {
        index: usize,
        #[source]
        source: BoxError,
    },

    #[error("re-compression of image {index} failed")]
    Processing {
        index: usize,
        #[source]
        source: BoxError,
    },
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("order submission failed")]
    OrderSubmission(#[source] BoxError),
}

impl FinalizeError {
    pub fn upload_failed(index: usize, err: anyhow::Error) -> Self {
        Self::UploadFailed {
            index,
            source: err.into(),
        }
    }

    pub fn processing(index: usize, err: anyhow::Error) -> Self {
        Self::Processing {
            index,
            source: err.into(),
        }
    }
}

impl From<anyhow::Error> for CheckoutError {
    fn from(err: anyhow::Error) -> Self {
        Self::OrderSubmission(err.into())
    }
}
