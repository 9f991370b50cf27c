use crate::metrics::column::Column;
use tracing::debug;

/// Finish slot value for a collection that has started but not yet finished.
pub const GC_FINISH_PENDING: i64 = -1;

/// The two aligned GC columns to store for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairedEvents {
    pub starts: Vec<i64>,
    pub finishes: Vec<i64>,
}

/// Pairs GC start/finish timestamps across polling intervals.
///
/// A collection may start in one sample and finish in a later one. The
/// engine remembers the row holding the one open start and closes it when
/// the matching finish arrives, patching that row in place and copying the
/// start into the closing row so the interval is visible from both.
/// At most one collection is assumed to be open at a time.
#[derive(Debug, Clone, Default)]
pub struct GcPairingEngine {
    first_start_observed: bool,
    pending_unpaired_start: Option<usize>,
}

impl GcPairingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn first_start_observed(&self) -> bool {
        self.first_start_observed
    }

    pub fn pending_unpaired_start(&self) -> Option<usize> {
        self.pending_unpaired_start
    }

    /// Computes the GC columns for `row` from this interval's raw events.
    ///
    /// `gc_starts`/`gc_finishes` are the already stored columns; the row
    /// holding a pending open start (always `< row`) may be rewritten.
    pub fn pair(
        &mut self,
        row: usize,
        raw_starts: &[i64],
        raw_finishes: &[i64],
        gc_starts: &Column<Vec<i64>>,
        gc_finishes: &mut Column<Vec<i64>>,
    ) -> PairedEvents {
        if raw_starts.is_empty() && raw_finishes.is_empty() {
            return PairedEvents::default();
        }

        let finishes = self.trim_leading_orphan(raw_starts, raw_finishes);

        let carry_in = self.pending_unpaired_start;
        // A carried start occupies slot 0 of this row.
        let lead = usize::from(carry_in.is_some());
        let start_slots = lead + raw_starts.len();
        let len = start_slots.max(finishes.len());

        let mut starts_out = vec![0; len];
        starts_out[lead..start_slots].copy_from_slice(raw_starts);

        let mut finishes_out = vec![0; len];
        finishes_out[..finishes.len()].copy_from_slice(finishes);

        let open = start_slots > finishes.len();
        if open {
            finishes_out[len - 1] = GC_FINISH_PENDING;
        }

        if let Some(carried_row) = carry_in {
            if let Some(&start) = gc_starts.get(carried_row).last() {
                starts_out[0] = start;
            }

            match finishes.first() {
                Some(&finish) => {
                    if let Some(slot) = gc_finishes.get_mut(carried_row).last_mut() {
                        *slot = finish;
                    }
                    debug!(row, carried_row, finish, "closed carried GC interval");
                }
                None => {
                    // Still running; this row sees it open as well.
                    finishes_out[0] = GC_FINISH_PENDING;
                }
            }
        }

        self.pending_unpaired_start = if open {
            debug!(row, "GC interval left open");
            Some(row)
        } else {
            None
        };

        PairedEvents {
            starts: starts_out,
            finishes: finishes_out,
        }
    }

    /// Drops a first finish that precedes the very first observed start: its
    /// collection began before observation did.
    fn trim_leading_orphan<'a>(&mut self, starts: &[i64], finishes: &'a [i64]) -> &'a [i64] {
        if self.first_start_observed || starts.is_empty() {
            return finishes;
        }
        self.first_start_observed = true;

        match (starts.first(), finishes.first()) {
            (Some(&start), Some(&finish)) if finish < start => {
                debug!(finish, start, "dropped GC finish observed before first start");
                &finishes[1..]
            }
            _ => finishes,
        }
    }
}
