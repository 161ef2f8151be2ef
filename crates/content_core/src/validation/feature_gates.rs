//! Runtime compatibility: the pack's engine range and per-collection
//! feature gates.

use crate::data::ParsedContentPack;
use crate::diagnostics::{Diagnostics, FieldPath, WarningCode};
use crate::options::ValidationConfig;
use crate::version::{Version, VersionRange};

/// Check the pack against `config.runtime_version`, when one is given.
pub fn check_runtime_compatibility(
    pack: &ParsedContentPack,
    config: &ValidationConfig,
    diagnostics: &mut Diagnostics<'_>,
) {
    let Some(runtime_text) = config.runtime_version.as_deref() else {
        return;
    };
    let runtime = match runtime_text.parse::<Version>() {
        Ok(runtime) => runtime,
        Err(error) => {
            diagnostics.error(
                FieldPath::from("options").key("runtimeVersion"),
                error.to_string(),
            );
            return;
        }
    };

    if let Ok(range) = pack.metadata.engine.parse::<VersionRange>() {
        if !range.matches(&runtime) {
            diagnostics.error(
                FieldPath::from("metadata").key("engine"),
                format!(
                    "pack '{}' targets runtime '{range}' but the runtime version is {runtime}",
                    pack.metadata.id
                ),
            );
        }
    }

    for (position, gate) in config.feature_gates.iter().enumerate() {
        if pack.module_len(gate.module) == 0 {
            continue;
        }
        let introduced = match gate.introduced_in.parse::<Version>() {
            Ok(version) => version,
            Err(error) => {
                diagnostics.error(
                    FieldPath::from("options")
                        .key("featureGates")
                        .index(position)
                        .key("introducedIn"),
                    error.to_string(),
                );
                continue;
            }
        };
        if introduced > runtime {
            diagnostics.report(
                gate.severity,
                WarningCode::FeatureGate,
                FieldPath::from(gate.module.key()),
                format!(
                    "'{}' requires runtime {introduced} or newer (runtime is {runtime})",
                    gate.module
                ),
            );
        }
    }
}
