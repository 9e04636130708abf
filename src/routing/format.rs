//! scanf-style path matching.
//!
//! Directives: `%d` signed decimal integer, `%s` non-empty string running up to
//! the next literal (or the end of the path), `%%` a literal percent sign.
//! Every other character matches itself.

use std::marker::PhantomData;

use crate::core::{Context, Error, Result};
use crate::part::{fail, Next, Part, Task};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Int,
    Str,
}

/// Value captured by a directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capture {
    Int(i64),
    Str(String),
}

/// Compiled format string.
#[derive(Clone, Debug)]
pub struct PathFormat {
    segments: Vec<Segment>,
}

impl PathFormat {
    /// Compile `format`, rejecting unknown directives.
    pub fn parse(format: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let directive = match chars.next() {
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some('d') => Segment::Int,
                Some('s') => Segment::Str,
                Some(other) => {
                    return Err(Error::Format(format!(
                        "unknown directive %{} in {:?}",
                        other, format
                    )))
                }
                None => return Err(Error::Format(format!("trailing % in {:?}", format))),
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            if segments.last() == Some(&Segment::Str) {
                return Err(Error::Format(format!(
                    "%s must be followed by a literal in {:?}",
                    format
                )));
            }
            segments.push(directive);
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Scan `input`. `None` on any mismatch, leftover or missing input.
    pub fn scan(&self, input: &str) -> Option<Vec<Capture>> {
        let mut rest = input;
        let mut captures = Vec::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(lit) => {
                    rest = rest.strip_prefix(lit.as_str())?;
                }
                Segment::Int => {
                    let (value, tail) = scan_int(rest)?;
                    captures.push(Capture::Int(value));
                    rest = tail;
                }
                Segment::Str => {
                    let end = match self.segments.get(i + 1) {
                        Some(Segment::Literal(lit)) => rest.find(lit.as_str())?,
                        _ => rest.len(),
                    };
                    if end == 0 {
                        return None;
                    }
                    let raw = &rest[..end];
                    captures.push(Capture::Str(
                        percent_encoding::percent_decode_str(raw)
                            .decode_utf8_lossy()
                            .into_owned(),
                    ));
                    rest = &rest[end..];
                }
            }
        }

        rest.is_empty().then_some(captures)
    }
}

/// Optional sign followed by at least one ASCII digit.
fn scan_int(input: &str) -> Option<(i64, &str)> {
    let bytes = input.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    let end = sign_len + digits;
    let value = input[..end].parse::<i64>().ok()?;
    Some((value, &input[end..]))
}

/// Conversion of a single capture.
pub trait FromCapture: Sized {
    fn from_capture(capture: Capture) -> Option<Self>;
}

impl FromCapture for i64 {
    fn from_capture(capture: Capture) -> Option<Self> {
        match capture {
            Capture::Int(v) => Some(v),
            Capture::Str(_) => None,
        }
    }
}

impl FromCapture for String {
    fn from_capture(capture: Capture) -> Option<Self> {
        match capture {
            Capture::Str(s) => Some(s),
            Capture::Int(_) => None,
        }
    }
}

impl FromCapture for Capture {
    fn from_capture(capture: Capture) -> Option<Self> {
        Some(capture)
    }
}

/// Conversion of the full capture list into the handler's argument.
pub trait FromCaptures: Sized {
    fn from_captures(captures: Vec<Capture>) -> Option<Self>;
}

impl FromCaptures for Vec<Capture> {
    fn from_captures(captures: Vec<Capture>) -> Option<Self> {
        Some(captures)
    }
}

impl FromCaptures for () {
    fn from_captures(captures: Vec<Capture>) -> Option<Self> {
        captures.is_empty().then_some(())
    }
}

/// A lone `%d` or `%s` can be taken without a 1-tuple.
macro_rules! impl_single_capture {
    ($($t:ty),+) => {
        $(
            impl FromCaptures for $t {
                fn from_captures(captures: Vec<Capture>) -> Option<Self> {
                    let [capture]: [Capture; 1] = captures.try_into().ok()?;
                    <$t>::from_capture(capture)
                }
            }
        )+
    };
}

impl_single_capture!(i64, String);

macro_rules! impl_from_captures {
    ($len:expr; $($t:ident),+) => {
        impl<$($t: FromCapture),+> FromCaptures for ($($t,)+) {
            fn from_captures(captures: Vec<Capture>) -> Option<Self> {
                if captures.len() != $len {
                    return None;
                }
                let mut iter = captures.into_iter();
                Some(($($t::from_capture(iter.next()?)?,)+))
            }
        }
    };
}

impl_from_captures!(1; A);
impl_from_captures!(2; A, B);
impl_from_captures!(3; A, B, C);
impl_from_captures!(4; A, B, C, D);

/// Part produced by [`path_format`].
pub struct PathFormatPart<T, F> {
    format: PathFormat,
    handler: F,
    _captures: PhantomData<fn() -> T>,
}

/// Match the path against `format` and run the part built by `handler`.
///
/// ```rust,ignore
/// let sum = path_format("/add/%d/%d", |(a, b): (i64, i64)| plain_text((a + b).to_string()))?;
/// ```
pub fn path_format<T, F, P>(format: &str, handler: F) -> Result<PathFormatPart<T, F>>
where
    T: FromCaptures + 'static,
    F: Fn(T) -> P + Send + Sync + 'static,
    P: Part,
{
    Ok(PathFormatPart {
        format: PathFormat::parse(format)?,
        handler,
        _captures: PhantomData,
    })
}

impl<T, F, P> Part for PathFormatPart<T, F>
where
    T: FromCaptures + 'static,
    F: Fn(T) -> P + Send + Sync + 'static,
    P: Part,
{
    fn call(&self, next: Next, ctx: Context) -> Task {
        let Some(values) = self
            .format
            .scan(ctx.request().path())
            .and_then(T::from_captures)
        else {
            return fail();
        };
        (self.handler)(values).call(next, ctx)
    }
}
