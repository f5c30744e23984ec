/// Request/response/error contract of the path engine
///
/// Two operations share these types:
/// - unary `GetOptimalPath`: one `PathRequest`, one `PathResponse`
/// - streaming `GetOptimalPathStream`: many `PathChunkRequest`s, one `PathResponse`

pub mod messages;
pub mod status;

pub use messages::{
    ConnectionChunk, ConnectionList, PathChunkRequest, PathRequest, PathResponse, PreparedRequest,
};
pub use status::{Code, PathError, PathResult, TransportError};
