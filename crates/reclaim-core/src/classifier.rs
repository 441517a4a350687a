//! Orphan classification of target pools

use crate::liveness::{Liveness, LivenessProber};
use reclaim_cloud::{CloudError, InstanceRef, ResourceKind, TargetPool};
use serde::Serialize;

/// Verdict for one target pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Classification {
    Orphaned { reason: OrphanReason },
    Live,
    /// Liveness could not be established; the pool is left alone this pass
    Indeterminate { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanReason {
    NoInstances,
    InstanceGone { instance: String },
}

impl std::fmt::Display for OrphanReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrphanReason::NoInstances => write!(f, "no bound instances"),
            OrphanReason::InstanceGone { instance } => {
                write!(f, "bound instance {} no longer exists", instance)
            }
        }
    }
}

/// Which bound instances decide a pool's liveness
///
/// `FirstInstance` probes only the first bound reference, so a pool whose
/// first instance is gone is orphaned even if later ones still run. That is
/// the long-standing behaviour and stays the default until the precision gap
/// is signed off; `AllInstances` requires every bound instance to be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingPolicy {
    #[default]
    FirstInstance,
    AllInstances,
}

pub struct OrphanClassifier<'a> {
    prober: LivenessProber<'a>,
    sampling: SamplingPolicy,
}

impl<'a> OrphanClassifier<'a> {
    pub fn new(prober: LivenessProber<'a>, sampling: SamplingPolicy) -> Self {
        Self { prober, sampling }
    }

    /// Fails only with [`CloudError::MalformedResource`] when a bound
    /// instance reference cannot be parsed.
    pub async fn classify(&self, pool: &TargetPool) -> Result<Classification, CloudError> {
        let sample: &[String] = match self.sampling {
            SamplingPolicy::FirstInstance => match pool.instances.first() {
                Some(first) => std::slice::from_ref(first),
                None => &[],
            },
            SamplingPolicy::AllInstances => &pool.instances,
        };

        if sample.is_empty() {
            return Ok(Classification::Orphaned {
                reason: OrphanReason::NoInstances,
            });
        }

        let refs = sample
            .iter()
            .map(|link| InstanceRef::parse(link))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CloudError::malformed(ResourceKind::TargetPool, &pool.name, e))?;

        let mut gone = None;
        let mut unknown = None;
        for instance in refs {
            match self.prober.probe(&instance.zone, &instance.name).await {
                Liveness::Present => return Ok(Classification::Live),
                Liveness::Absent => {
                    gone.get_or_insert(instance);
                }
                Liveness::Unknown { error } => {
                    unknown.get_or_insert(format!("{}: {}", instance, error));
                }
            }
        }

        if let Some(reason) = unknown {
            return Ok(Classification::Indeterminate { reason });
        }
        let Some(instance) = gone else {
            return Ok(Classification::Indeterminate {
                reason: "no bound instance was checked".to_string(),
            });
        };
        Ok(Classification::Orphaned {
            reason: OrphanReason::InstanceGone {
                instance: instance.to_string(),
            },
        })
    }
}
