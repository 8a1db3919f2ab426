//! Reconciliation targets and the kind to API-coordinate table.

use crate::error::MonitorError;
use flux_client::ResourceCoordinates;
use std::fmt;
use std::str::FromStr;

const KUSTOMIZATIONS: ResourceCoordinates = ResourceCoordinates {
    group: "kustomize.toolkit.fluxcd.io",
    version: "v1",
    kind: "Kustomization",
    plural: "kustomizations",
};

const HELM_RELEASES: ResourceCoordinates = ResourceCoordinates {
    group: "helm.toolkit.fluxcd.io",
    version: "v2beta1",
    kind: "HelmRelease",
    plural: "helmreleases",
};

const GIT_REPOSITORIES: ResourceCoordinates = ResourceCoordinates {
    group: "source.toolkit.fluxcd.io",
    version: "v1",
    kind: "GitRepository",
    plural: "gitrepositories",
};

/// Flux object kinds the monitor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `kustomize.toolkit.fluxcd.io` Kustomization
    Kustomization,
    /// `helm.toolkit.fluxcd.io` HelmRelease
    HelmRelease,
    /// `source.toolkit.fluxcd.io` GitRepository (`source` or `gitrepository`)
    Source,
}

impl ResourceKind {
    /// Every supported kind
    pub const ALL: [Self; 3] = [Self::Kustomization, Self::HelmRelease, Self::Source];

    /// API coordinates used to fetch the resource's status
    #[must_use]
    pub const fn coordinates(self) -> ResourceCoordinates {
        match self {
            Self::Kustomization => KUSTOMIZATIONS,
            Self::HelmRelease => HELM_RELEASES,
            Self::Source => GIT_REPOSITORIES,
        }
    }

    /// Canonical command-line spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kustomization => "kustomization",
            Self::HelmRelease => "helmrelease",
            Self::Source => "source",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = MonitorError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "kustomization" => Ok(Self::Kustomization),
            "helmrelease" => Ok(Self::HelmRelease),
            "source" | "gitrepository" => Ok(Self::Source),
            other => Err(MonitorError::UnsupportedKind(other.to_string())),
        }
    }
}

/// Resolves a kind name straight to its API coordinates.
///
/// # Errors
/// `MonitorError::UnsupportedKind` for anything outside the table.
pub fn resolve_kind(kind: &str) -> Result<ResourceCoordinates, MonitorError> {
    Ok(kind.parse::<ResourceKind>()?.coordinates())
}

/// The object watched for the lifetime of a monitor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileTarget {
    /// Flux kind
    pub kind: ResourceKind,
    /// Object name
    pub name: String,
    /// Object namespace
    pub namespace: String,
}

impl ReconcileTarget {
    /// Creates a new target
    pub fn new(kind: ResourceKind, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ReconcileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_kinds() {
        let kustomization = resolve_kind("kustomization").unwrap();
        assert_eq!(kustomization.group, "kustomize.toolkit.fluxcd.io");
        assert_eq!(kustomization.version, "v1");
        assert_eq!(kustomization.plural, "kustomizations");

        let helm_release = resolve_kind("helmrelease").unwrap();
        assert_eq!(helm_release.group, "helm.toolkit.fluxcd.io");
        assert_eq!(helm_release.version, "v2beta1");
        assert_eq!(helm_release.plural, "helmreleases");

        let source = resolve_kind("source").unwrap();
        assert_eq!(source.group, "source.toolkit.fluxcd.io");
        assert_eq!(source.version, "v1");
        assert_eq!(source.plural, "gitrepositories");
    }

    #[test]
    fn test_gitrepository_is_an_alias_for_source() {
        assert_eq!("gitrepository".parse::<ResourceKind>().unwrap(), ResourceKind::Source);
        assert_eq!(resolve_kind("gitrepository").unwrap(), resolve_kind("source").unwrap());
    }

    #[test]
    fn test_unknown_kinds_are_rejected() {
        for kind in ["", "Kustomization", "ocirepository", "helmrepository", "source git"] {
            match resolve_kind(kind) {
                Err(MonitorError::UnsupportedKind(rejected)) => assert_eq!(rejected, kind),
                other => panic!("expected UnsupportedKind for {kind:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_canonical_names_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.as_str().parse::<ResourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_target_display() {
        let target = ReconcileTarget::new(ResourceKind::HelmRelease, "podinfo", "apps");
        assert_eq!(target.to_string(), "helmrelease apps/podinfo");
    }
}
