//! Structured data encoders used by the non-template dispatchers.
//!
//! These bypass templates entirely and write straight to the response body.

use std::io::Write;

use serde::Serialize;

use crate::error::RenderError;

/// Writes compact JSON followed by a newline.
pub fn write_json<W, T>(mut out: W, data: &T) -> Result<(), RenderError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_json::to_writer(&mut out, data)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Writes YAML.
pub fn write_yaml<W, T>(out: W, data: &T) -> Result<(), RenderError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    serde_yaml::to_writer(out, data)?;
    Ok(())
}

/// Root element for payloads that carry no type name, such as maps and
/// scalars.
pub const XML_ROOT: &str = "data";

/// Writes XML.
///
/// A named struct becomes the root element under its own type name. Anything
/// else is wrapped in [`XML_ROOT`]. Map keys are used as element names
/// unchanged, so a key that is not a valid XML name fails to encode.
pub fn write_xml<W, T>(mut out: W, data: &T) -> Result<(), RenderError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let xml = match quick_xml::se::to_string(data) {
        Ok(xml) => xml,
        Err(_) => quick_xml::se::to_string_with_root(XML_ROOT, data)?,
    };
    out.write_all(xml.as_bytes())?;
    Ok(())
}
