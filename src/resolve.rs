//! Extraction-target resolution for the cross-section command.
//!
//! The host command needs exactly one mesh and one bone to cast its ray.
//! Both may be named explicitly on the command line, or taken from the
//! active selection. This module keeps that decision pure and explicit: it
//! looks only at the node list it is given and returns a tagged result.

use crate::error::{ResolveError, Result};

/// Classification of a scene node, as far as target resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mesh,
    Joint,
    Other,
}

/// A named scene node with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
}

impl SceneNode {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The resolved mesh/bone pair the extraction command operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionTargets {
    pub mesh: String,
    pub bone: String,
}

/// Resolves the mesh and bone the extraction should target.
///
/// When both names are given explicitly, each must exist in `scene`.
/// When either is missing, the selection path applies to both: `scene` must
/// contain exactly one mesh and exactly one joint.
///
/// # Errors
///
/// - `ResolveError::NameNotFound` for an explicit name with no scene node.
/// - `ResolveError::NoMeshSelected` / `MultipleMeshes` and
///   `NoBoneSelected` / `MultipleBones` for a selection that does not pin
///   down exactly one of each.
pub fn resolve_targets(
    mesh_name: Option<&str>,
    bone_name: Option<&str>,
    scene: &[SceneNode],
) -> Result<ExtractionTargets> {
    if let (Some(mesh), Some(bone)) = (mesh_name, bone_name) {
        for name in [mesh, bone] {
            if !scene.iter().any(|node| node.name == name) {
                return Err(ResolveError::NameNotFound(name.to_string()).into());
            }
        }
        return Ok(ExtractionTargets {
            mesh: mesh.to_string(),
            bone: bone.to_string(),
        });
    }

    let mesh = unique_of_kind(scene, NodeKind::Mesh)?;
    let bone = unique_of_kind(scene, NodeKind::Joint)?;
    Ok(ExtractionTargets {
        mesh: mesh.to_string(),
        bone: bone.to_string(),
    })
}

fn unique_of_kind(scene: &[SceneNode], kind: NodeKind) -> Result<&str> {
    let mut matches = scene.iter().filter(|node| node.kind == kind);
    let first = matches.next();
    let rest = matches.count();
    match (first, rest, kind) {
        (Some(node), 0, _) => Ok(&node.name),
        (None, _, NodeKind::Mesh) => Err(ResolveError::NoMeshSelected.into()),
        (None, _, _) => Err(ResolveError::NoBoneSelected.into()),
        (Some(_), extra, NodeKind::Mesh) => Err(ResolveError::MultipleMeshes(extra + 1).into()),
        (Some(_), extra, _) => Err(ResolveError::MultipleBones(extra + 1).into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scene() -> Vec<SceneNode> {
        vec![
            SceneNode::new("body_mesh", NodeKind::Mesh),
            SceneNode::new("upper_leg", NodeKind::Joint),
            SceneNode::new("locator1", NodeKind::Other),
        ]
    }

    #[test]
    fn explicit_names_resolve_directly() {
        let targets = resolve_targets(Some("body_mesh"), Some("upper_leg"), &scene()).unwrap();
        assert_eq!(targets.mesh, "body_mesh");
        assert_eq!(targets.bone, "upper_leg");
    }

    #[test]
    fn unknown_explicit_name_is_rejected() {
        assert!(resolve_targets(Some("missing"), Some("upper_leg"), &scene()).is_err());
    }

    #[test]
    fn selection_path_picks_the_unique_pair() {
        let targets = resolve_targets(None, None, &scene()).unwrap();
        assert_eq!(targets.mesh, "body_mesh");
        assert_eq!(targets.bone, "upper_leg");
    }

    #[test]
    fn missing_bone_name_falls_back_to_selection() {
        // One explicit name alone is not enough; the selection must still
        // pin down both targets.
        let targets = resolve_targets(Some("body_mesh"), None, &scene()).unwrap();
        assert_eq!(targets.bone, "upper_leg");
    }

    #[test]
    fn empty_selection_reports_missing_mesh() {
        let err = resolve_targets(None, None, &[]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EllifitError::Resolve(ResolveError::NoMeshSelected)
        ));
    }

    #[test]
    fn ambiguous_selection_reports_the_count() {
        let mut nodes = scene();
        nodes.push(SceneNode::new("second_mesh", NodeKind::Mesh));
        let err = resolve_targets(None, None, &nodes).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EllifitError::Resolve(ResolveError::MultipleMeshes(2))
        ));
    }

    #[test]
    fn multiple_joints_are_rejected() {
        let mut nodes = scene();
        nodes.push(SceneNode::new("lower_leg", NodeKind::Joint));
        let err = resolve_targets(None, None, &nodes).unwrap_err();
        assert!(matches!(
            err,
            crate::error::EllifitError::Resolve(ResolveError::MultipleBones(2))
        ));
    }
}
