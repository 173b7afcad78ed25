/*!
A crate for writing minimal, single-revision PDF files.

`folio-write` accumulates finished object payloads and serializes them into a
complete static document: header, object bodies, cross-reference table and
trailer. Payloads are opaque byte strings; the builder only assigns
identifiers, tracks byte offsets and emits the surrounding structure.
Identifiers can be reserved before their payload exists, so an object can
reference another that has not been built yet.

# Example
```rust
use folio_write::DocumentBuilder;

let mut builder = DocumentBuilder::new();

let pages = builder.reserve();
let page = builder.add(format!(
    "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 612 792] >>",
    pages.get()
));
builder.set(
    pages,
    format!("<< /Type /Pages /Kids [{} 0 R] /Count 1 >>", page.get()),
)?;

let catalog = builder.add(format!("<< /Type /Catalog /Pages {} 0 R >>", pages.get()));
builder.set_root(catalog)?;

let bytes = builder.build()?;
assert!(bytes.starts_with(b"%PDF-1.4\n"));
# Ok::<(), folio_write::Error>(())
```
*/

#![forbid(unsafe_code)]

mod error;
pub mod image;
pub mod object;

pub use error::{Error, Result};

/// A 1-based identifier for an object slot.
///
/// Identifiers are handed out densely in insertion order; they are the
/// addressing mechanism of the output format itself, so payloads reference
/// each other as `<id> 0 R` rather than through pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    /// The numeric value used to reference this object, e.g. in `3 0 R`.
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Assembles indirect objects into a complete document.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    objects: Vec<Option<Vec<u8>>>,
    root: Option<ObjectId>,
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new object with its payload already set.
    pub fn add(&mut self, payload: impl Into<Vec<u8>>) -> ObjectId {
        self.objects.push(Some(payload.into()));

        ObjectId(self.objects.len() as u32)
    }

    /// Append a new object slot whose payload will be filled in later.
    ///
    /// The returned identifier can be referenced by other objects right away.
    pub fn reserve(&mut self) -> ObjectId {
        self.objects.push(None);

        ObjectId(self.objects.len() as u32)
    }

    /// Fill a previously reserved slot.
    ///
    /// Setting an already-filled slot overwrites the payload.
    pub fn set(&mut self, id: ObjectId, payload: impl Into<Vec<u8>>) -> Result<()> {
        let slot = id
            .0
            .checked_sub(1)
            .and_then(|index| self.objects.get_mut(index as usize))
            .ok_or(Error::InvalidReference(id))?;
        *slot = Some(payload.into());

        Ok(())
    }

    /// Designate the document's root object. The last designation wins.
    ///
    /// Whether the object is actually catalog-shaped is the caller's
    /// responsibility.
    pub fn set_root(&mut self, id: ObjectId) -> Result<()> {
        if id.0 == 0 || id.0 as usize > self.objects.len() {
            return Err(Error::InvalidReference(id));
        }
        self.root = Some(id);

        Ok(())
    }

    /// Serialize the accumulated objects into the final document.
    ///
    /// This is a pure function of the builder's state: offsets are recorded
    /// during a single forward emission pass, so the cross-reference record
    /// for each object holds the exact byte position at which its wrapper
    /// begins.
    pub fn build(&self) -> Result<Vec<u8>> {
        let root = self.root.ok_or(Error::MissingRoot)?;

        let mut out = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(self.objects.len());

        for (index, slot) in self.objects.iter().enumerate() {
            let payload = slot
                .as_ref()
                .ok_or(Error::IncompleteObject(ObjectId(index as u32 + 1)))?;

            offsets.push(out.len());
            out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
            out.extend_from_slice(payload);
            if !payload.ends_with(b"\n") {
                out.push(b'\n');
            }
            out.extend_from_slice(b"endobj\n");
        }

        // The table gets one extra record for the object 0 sentinel.
        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", self.objects.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in offsets {
            out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }

        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
                self.objects.len() + 1,
                root.get(),
                xref_offset
            )
            .as_bytes(),
        );

        Ok(out)
    }
}
