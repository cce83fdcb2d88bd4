use super::prepare::prepare_into;
use crate::core::models::render_data::MoleculeRenderData;
use crate::core::models::structure::Structure;
use crate::core::settings::RenderSettings;
use crate::engine::config::RenderOptions;
use crate::engine::context::{RenderContext, RenderScratch};
use crate::engine::metrics::TextMetrics;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fmt::Display;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A populated structure handed to the batch sink.
///
/// The render data is borrowed from the worker's workspace and is overwritten by the
/// worker's next item.
#[derive(Debug, Clone, Copy)]
pub struct BatchItem<'a> {
    pub index: usize,
    pub structure: &'a Structure,
    pub settings: &'a RenderSettings,
    pub data: &'a MoleculeRenderData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    /// Failed items in input order.
    pub failures: Vec<BatchFailure>,
}

/// Buffers owned by one worker and reused for every item it processes.
#[derive(Default)]
struct Workspace {
    data: MoleculeRenderData,
    scratch: RenderScratch,
}

/// Prepares every structure and passes the result to `sink`.
///
/// All structures share one [`RenderSettings`] derived from `options`. A structure
/// that fails to prepare, or whose sink call fails, is logged and recorded in the
/// summary; the remaining items are still processed.
#[instrument(skip_all, name = "batch_workflow", fields(total = structures.len()))]
pub fn run<F, E>(
    structures: &[Structure],
    options: &RenderOptions,
    metrics: &dyn TextMetrics,
    reporter: &ProgressReporter,
    sink: F,
) -> BatchSummary
where
    F: Fn(BatchItem<'_>) -> Result<(), E> + Sync,
    E: Display,
{
    let settings = RenderSettings::new(options.scale_factor());
    let ctx = RenderContext::new(&settings, options, metrics);
    reporter.report(Progress::BatchStart {
        total: structures.len() as u64,
    });

    let process = |ws: &mut Workspace, (index, structure): (usize, &Structure)| {
        let outcome = prepare_into(structure, &ctx, &mut ws.scratch, &mut ws.data)
            .map_err(|e| e.to_string())
            .and_then(|()| {
                sink(BatchItem {
                    index,
                    structure,
                    settings: &settings,
                    data: &ws.data,
                })
                .map_err(|e| e.to_string())
            });
        reporter.report(Progress::ItemFinished {
            index,
            ok: outcome.is_ok(),
        });
        outcome.map_err(|reason| {
            warn!(index, name = %structure.name, %reason, "Skipping structure.");
            reporter.report(Progress::Message(format!(
                "Skipped '{}': {}",
                structure.name, reason
            )));
            BatchFailure {
                index,
                name: structure.name.clone(),
                reason,
            }
        })
    };

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Result<(), BatchFailure>> = structures
        .par_iter()
        .enumerate()
        .map_init(Workspace::default, |ws, item| process(ws, item))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Result<(), BatchFailure>> = {
        let mut ws = Workspace::default();
        structures
            .iter()
            .enumerate()
            .map(|item| process(&mut ws, item))
            .collect()
    };

    let mut summary = BatchSummary::default();
    for outcome in outcomes {
        match outcome {
            Ok(()) => summary.succeeded += 1,
            Err(failure) => summary.failures.push(failure),
        }
    }

    reporter.report(Progress::BatchFinish);
    info!(
        succeeded = summary.succeeded,
        failed = summary.failures.len(),
        "Batch finished."
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bond::BondOrder;
    use crate::core::models::structure::{StructureAtom, StructureBond};
    use crate::engine::config::RenderOptionsBuilder;
    use crate::engine::metrics::MonospaceMetrics;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn diatomic(name: &str, a: &str, b: &str) -> Structure {
        let mut s = Structure::new(name);
        s.atoms.push(StructureAtom::new(a, 0.0, 0.0));
        s.atoms.push(StructureAtom::new(b, 1.0, 0.0));
        s.bonds.push(StructureBond::new(0, 1, BondOrder::Single));
        s
    }

    fn options() -> RenderOptions {
        RenderOptionsBuilder::new().bond_length(30.0).build().unwrap()
    }

    #[test]
    fn every_structure_reaches_the_sink() {
        let structures: Vec<_> = (0..8)
            .map(|i| diatomic(&format!("m{i}"), "C", "O"))
            .collect();
        let seen = Mutex::new(Vec::new());
        let summary = run(
            &structures,
            &options(),
            &MonospaceMetrics::default(),
            &ProgressReporter::new(),
            |item| {
                assert_eq!(item.data.atoms.len(), 2);
                seen.lock().unwrap().push(item.index);
                Ok::<(), String>(())
            },
        );
        assert_eq!(summary.succeeded, 8);
        assert!(summary.failures.is_empty());
        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn failures_are_isolated_and_reported() {
        let structures = vec![
            diatomic("good", "C", "N"),
            diatomic("bad", "C", "Qq"),
            diatomic("rejected", "C", "S"),
        ];
        let finished = AtomicUsize::new(0);
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::ItemFinished { .. } => {
                finished.fetch_add(1, Ordering::Relaxed);
            }
            Progress::Message(msg) => messages.lock().unwrap().push(msg),
            _ => {}
        }));
        let summary = run(
            &structures,
            &options(),
            &MonospaceMetrics::default(),
            &reporter,
            |item| {
                if item.structure.name == "rejected" {
                    Err("sink refused")
                } else {
                    Ok(())
                }
            },
        );
        drop(reporter);
        assert_eq!(summary.succeeded, 1);
        let failed: Vec<_> = summary.failures.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(failed, vec!["bad", "rejected"]);
        assert_eq!(summary.failures[1].reason, "sink refused");
        assert_eq!(finished.into_inner(), 3);
        let mut messages = messages.into_inner().unwrap();
        messages.sort();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Skipped 'bad': "));
        assert_eq!(messages[1], "Skipped 'rejected': sink refused");
    }
}
