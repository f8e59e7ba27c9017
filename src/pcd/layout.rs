//! Record layout derived from header metadata.
//!
//! The header's FIELDS/SIZE/TYPE/COUNT columns are collapsed into one
//! ordered list of named scalars. That order *is* the byte order of a
//! `binary` row and the chunk order of a `binary_compressed` body.

use std::collections::HashSet;

use crate::pcd::PcdMetadata;
use crate::util::{Error, Result, ScalarType};

/// One named scalar slot of the decoded record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub ty: ScalarType,
}

/// Ordered field layout of a point record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldLayout {
    fields: Vec<FieldSpec>,
}

impl FieldLayout {
    /// Apply the COUNT semantics to header metadata.
    ///
    /// - `COUNT 1` emits the field as-is.
    /// - `COUNT 0` drops the field.
    /// - `COUNT c > 1` expands into `c` sub-fields `name_0000 .. name_{c-1}`.
    /// - `COUNT c < 0` strips `|c|` bytes of already-emitted trailing
    ///   fields (historical padding-removal signal, kept for compatibility
    ///   with files in the wild).
    ///
    /// Duplicate names are resolved first by appending `"1"` until unique.
    pub fn from_metadata(meta: &PcdMetadata) -> Result<Self> {
        let names = dedupe_names(&meta.fields);
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(names.len());

        for (i, name) in names.into_iter().enumerate() {
            let code = meta.type_codes[i].as_str();
            // resolve the scalar before looking at COUNT: an unknown
            // SIZE/TYPE pair is fatal even for a dropped field
            let ty = ScalarType::from_header(code, meta.size[i]).ok_or_else(|| {
                Error::UnsupportedField {
                    size: meta.size[i],
                    code: code.to_string(),
                }
            })?;

            match meta.count[i] {
                1 => fields.push(FieldSpec { name, ty }),
                0 => {}
                c if c > 1 => {
                    for k in 0..c {
                        fields.push(FieldSpec {
                            name: format!("{name}_{k:04}"),
                            ty,
                        });
                    }
                }
                c => {
                    let mut remaining = -c;
                    while remaining > 0 {
                        match fields.pop() {
                            Some(f) => remaining -= f.ty.num_bytes() as i64,
                            None => break,
                        }
                    }
                }
            }
        }

        Ok(Self { fields })
    }

    /// Number of scalar slots in a record.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Bytes per row of a `binary` body.
    pub fn stride(&self) -> usize {
        self.fields.iter().map(|f| f.ty.num_bytes()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn get(&self, i: usize) -> Option<&FieldSpec> {
        self.fields.get(i)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }
}

fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    names
        .iter()
        .map(|n| {
            let mut name = n.clone();
            while seen.contains(&name) {
                name.push('1');
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}
