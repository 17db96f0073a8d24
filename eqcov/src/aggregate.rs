//! Merging per-case coverage declarations into one descriptor per method.

use std::collections::HashMap;

use crate::errors::{AuditError, Result};
use crate::model::{CoverageDeclaration, MergedCoverageDescriptor, MethodSignature, UnitDescriptor};

/// Merge declarations that target the same method signature.
///
/// Output is ordered by the first appearance of each signature. Within a
/// category, ids are concatenated in declaration order; duplicates are kept.
pub fn combine<'a, I>(declarations: I) -> Vec<MergedCoverageDescriptor>
where
    I: IntoIterator<Item = &'a CoverageDeclaration>,
{
    let mut position: HashMap<&MethodSignature, usize> = HashMap::new();
    let mut groups: Vec<(&MethodSignature, Vec<&CoverageDeclaration>)> = Vec::new();

    for declaration in declarations {
        match position.get(&declaration.signature) {
            Some(&index) => groups[index].1.push(declaration),
            None => {
                position.insert(&declaration.signature, groups.len());
                groups.push((&declaration.signature, vec![declaration]));
            }
        }
    }

    groups
        .into_iter()
        .map(|(signature, group)| {
            let merged = UnitDescriptor::builder(signature.clone())
                .valid_ecs(group.iter().flat_map(|d| d.valid_ecs.iter().copied()))
                .invalid_ecs(group.iter().flat_map(|d| d.invalid_ecs.iter().copied()))
                .boundaries(group.iter().flat_map(|d| d.boundaries.iter().copied()))
                .build();
            tracing::debug!(
                signature = %signature,
                declarations = group.len(),
                valid = merged.valid_ecs().len(),
                invalid = merged.invalid_ecs().len(),
                boundaries = merged.boundaries().len(),
                "merged coverage declarations"
            );
            merged
        })
        .collect()
}

/// Find the merged descriptor for `signature`.
///
/// Returns `Ok(None)` when nothing matches. An unset signature is a caller
/// error and fails with [`AuditError::InvalidArgument`].
pub fn select<'a>(
    descriptors: &'a [MergedCoverageDescriptor],
    signature: &MethodSignature,
) -> Result<Option<&'a MergedCoverageDescriptor>> {
    if signature.is_unset() {
        return Err(AuditError::unset_signature("select"));
    }

    Ok(descriptors
        .iter()
        .find(|descriptor| descriptor.signature() == signature))
}
