use super::Middleware;
use crate::server::{Request, Response};

/// Reverses the response body.
///
/// Mostly useful to see the pipeline at work: responses come out backwards.
/// The reversal is per character when the body is UTF-8 and per byte
/// otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseBody;

impl Middleware for ReverseBody {
    fn after(&self, _req: &Request, res: &mut Response) {
        match std::str::from_utf8(&res.body) {
            Ok(text) => res.body = text.chars().rev().collect::<String>().into_bytes(),
            Err(_) => res.body.reverse(),
        }
    }
}
