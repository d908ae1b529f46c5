use crate::Error;
use crate::consts::FIELD_SEPARATOR;

const PARENT_KEY: &str = "fk_field1";
const CHILD_KEY: &str = "fk_field2";
const FK_FIELD_SEPARATOR: char = '+';

/// Parsed form of a relation field's `fk` annotation.
///
/// `fk_field1:a+b,fk_field2:c+d` describes an in-memory equijoin: the
/// parent's field `a` must compare equal to the child's field `c`, and `b`
/// to `d`, for the child to be attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKey {
    pub parent_fields: Vec<String>,
    pub child_fields: Vec<String>,
}

impl ForeignKey {
    /// Parses an annotation string. Unknown segments are ignored; missing
    /// sides are caught by [`ForeignKey::validate`].
    pub fn parse(tag: &str) -> Self {
        let mut fk = ForeignKey::default();
        for segment in tag.split(FIELD_SEPARATOR) {
            let Some((key, fields)) = segment.split_once(':') else {
                continue;
            };
            let fields: Vec<String> = fields
                .split(FK_FIELD_SEPARATOR)
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect();
            match key.trim() {
                PARENT_KEY => fk.parent_fields = fields,
                CHILD_KEY => fk.child_fields = fields,
                _ => {}
            }
        }
        fk
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.parent_fields.is_empty() || self.child_fields.is_empty() {
            return Err(Error::MissingFkField);
        }
        Ok(())
    }

    /// Parent/child field pairs in join order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parent_fields
            .iter()
            .zip(self.child_fields.iter())
            .map(|(p, c)| (p.as_str(), c.as_str()))
    }
}
