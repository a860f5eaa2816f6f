use std::error::Error;
use std::fmt;
use std::io;

pub type OpResult<T> = Result<T, OpError>;

macro_rules! impl_error {
    ( $ty:ty, $variant:ident ) => {
        impl From<$ty> for OpError {
            fn from(err: $ty) -> Self {
                OpError::new(OpErrorKind::$variant(err))
            }
        }
    };
}

///
/// Error returned by every fallible operation of this crate.
///
/// `kind` tells which layer failed, `message` carries optional context.
///
#[derive(Debug)]
pub struct OpError {
    pub kind: OpErrorKind,
    pub message: String,
}

impl OpError {
    pub fn new(kind: OpErrorKind) -> Self {
        OpError {
            kind,
            message: String::new(),
        }
    }

    pub fn join_msg(mut self, msg: &str) -> Self {
        if !self.message.is_empty() {
            self.message.push_str(": ");
        }
        self.message.push_str(msg);
        self
    }

    pub(crate) fn bad_magic(magic: u32, offset: u64) -> Self {
        OpError::new(OpErrorKind::BadMagic { magic, offset })
    }

    pub(crate) fn truncated(field: &'static str, offset: u64) -> Self {
        OpError::new(OpErrorKind::Truncated { field, offset })
    }

    pub(crate) fn decode(step: &'static str, offset: u64) -> Self {
        OpError::new(OpErrorKind::DecodeError { step, offset })
    }

    /// byte offset the failure points at, when the failing layer knows one
    pub fn offset(&self) -> Option<u64> {
        match self.kind {
            OpErrorKind::BadMagic { offset, .. }
            | OpErrorKind::Truncated { offset, .. }
            | OpErrorKind::DecodeError { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", &self.kind)
        } else {
            write!(f, "{} ({})", &self.kind, &self.message)
        }
    }
}

impl Error for OpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.kind.source()
    }
}

#[derive(Debug)]
pub enum OpErrorKind {
    None,
    IoError(io::Error),
    /// frame does not start with the network magic
    BadMagic { magic: u32, offset: u64 },
    /// block file ends inside a frame
    Truncated { field: &'static str, offset: u64 },
    /// payload is structurally inconsistent
    DecodeError { step: &'static str, offset: u64 },
    JsonError(serde_json::Error),
    RuntimeError,
}

impl fmt::Display for OpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpErrorKind::IoError(ref err) => write!(f, "io error: {}", err),
            OpErrorKind::BadMagic { magic, offset } => {
                write!(f, "bad magic 0x{:08x} at offset {}", magic, offset)
            }
            OpErrorKind::Truncated { field, offset } => {
                write!(f, "truncated {} at offset {}", field, offset)
            }
            OpErrorKind::DecodeError { step, offset } => {
                write!(f, "failed to decode {} at payload offset {}", step, offset)
            }
            OpErrorKind::JsonError(ref err) => write!(f, "json error: {}", err),
            OpErrorKind::None => write!(f, ""),
            OpErrorKind::RuntimeError => write!(f, "runtime error"),
        }
    }
}

impl Error for OpErrorKind {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            OpErrorKind::IoError(ref err) => Some(err),
            OpErrorKind::JsonError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl_error!(io::Error, IoError);
impl_error!(serde_json::Error, JsonError);

impl From<String> for OpError {
    fn from(err: String) -> Self {
        OpError::new(OpErrorKind::RuntimeError).join_msg(&err)
    }
}

impl From<&str> for OpError {
    fn from(err: &str) -> Self {
        OpError::new(OpErrorKind::RuntimeError).join_msg(err)
    }
}
