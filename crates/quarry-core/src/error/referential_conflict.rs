use super::Error;
use crate::schema::ReferenceImpact;

/// Error when a delete or key change is refused because other rows still
/// reference the affected rows.
///
/// Raised either by the reference-integrity guard (with the blocking
/// references) or by the storage engine's own foreign key enforcement (with
/// the engine message).
#[derive(Debug)]
pub(super) struct ReferentialConflictError {
    source: ConflictSource,
    impacts: Vec<ReferenceImpact>,
}

#[derive(Debug)]
enum ConflictSource {
    Engine(Box<str>),
    Guard(Box<str>),
}

impl std::error::Error for ReferentialConflictError {}

impl core::fmt::Display for ReferentialConflictError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("referential conflict: ")?;

        match &self.source {
            ConflictSource::Engine(message) => f.write_str(message),
            ConflictSource::Guard(table) => {
                write!(f, "rows of `{table}` are still referenced by ")?;

                let mut s = "";
                for impact in &self.impacts {
                    write!(
                        f,
                        "{s}{}.{} ({} rows)",
                        impact.referencing_table,
                        impact.referencing_column,
                        impact.affected_row_count
                    )?;
                    s = ", ";
                }
                Ok(())
            }
        }
    }
}

impl Error {
    /// Creates a referential conflict from a storage engine message.
    pub fn referential_conflict(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::ReferentialConflict(
            ReferentialConflictError {
                source: ConflictSource::Engine(message.into().into()),
                impacts: vec![],
            },
        ))
    }

    /// Creates a referential conflict listing the references that block a
    /// change to rows of `table`.
    pub fn referential_conflict_with_impacts(
        table: impl Into<String>,
        impacts: Vec<ReferenceImpact>,
    ) -> Error {
        Error::from(super::ErrorKind::ReferentialConflict(
            ReferentialConflictError {
                source: ConflictSource::Guard(table.into().into()),
                impacts,
            },
        ))
    }

    /// Returns `true` if this error is a referential conflict.
    pub fn is_referential_conflict(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::ReferentialConflict(_))
    }

    /// The blocking references carried by the first referential conflict in
    /// this error's chain. Conflicts reported by the engine carry none.
    pub fn reference_impacts(&self) -> Option<&[ReferenceImpact]> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::ReferentialConflict(conflict) => Some(&conflict.impacts[..]),
            _ => None,
        })
    }
}
