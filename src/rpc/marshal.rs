//! Bounded copies across the trust boundary.
//!
//! These are the only functions that interpret an untrusted length field and
//! copy into a fixed-capacity destination. Capacity is part of the
//! destination's type, so there is no caller-side size arithmetic to get
//! wrong. On any error the destination is left exactly as it was.

use heapless::{String, Vec};

use super::buffer::{QueryRequest, QueryResponse};
use super::status::QueryError;

/// Copy a length-prefixed byte list from `query` into `dest`.
///
/// Returns the number of bytes copied. `RequestTooSmall` if the payload does
/// not contain a well-formed list, `RequestTooLarge` if the declared length
/// exceeds `N`.
pub fn copy_bounded<const N: usize>(
    query: &mut QueryRequest<'_>,
    dest: &mut Vec<u8, N>,
) -> Result<usize, QueryError> {
    let bytes = query.read_u8_list()?;
    if bytes.len() > N {
        return Err(QueryError::RequestTooLarge);
    }
    dest.clear();
    dest.extend_from_slice(bytes)
        .map_err(|()| QueryError::RequestTooLarge)?;
    Ok(bytes.len())
}

/// Copy a length-prefixed string from `query` into `dest`.
///
/// At most `N - 1` bytes are accepted, one slot short of the container, so
/// values fit the same fields on devices that keep a terminator. The bytes
/// must be UTF-8; anything else is treated as a malformed payload.
pub fn copy_bounded_string<const N: usize>(
    query: &mut QueryRequest<'_>,
    dest: &mut String<N>,
) -> Result<usize, QueryError> {
    let bytes = query.read_u8_list()?;
    if bytes.len() >= N {
        return Err(QueryError::RequestTooLarge);
    }
    let text = core::str::from_utf8(bytes).map_err(|_| QueryError::RequestTooSmall)?;
    dest.clear();
    dest.push_str(text)
        .map_err(|()| QueryError::RequestTooLarge)?;
    Ok(text.len())
}

/// Write `bytes` as a length-prefixed record. Never writes a partial record.
pub fn write_length_prefixed(
    response: &mut QueryResponse<'_>,
    bytes: &[u8],
) -> Result<(), QueryError> {
    response.write_u8_list(bytes)
}

/// Write a string as a length-prefixed record, without terminator.
pub fn write_str(response: &mut QueryResponse<'_>, text: &str) -> Result<(), QueryError> {
    write_length_prefixed(response, text.as_bytes())
}
