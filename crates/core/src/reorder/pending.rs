use serde::{Deserialize, Serialize};

/// One outstanding order line: stock that is already ordered or in transit,
/// in base units. `reference` is a free-form identifier (PO number, transfer
/// id) carried through for reporting only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingOrderLine {
    pub reference: String,
    pub quantity: f64,
}

/// Sums outstanding order lines into the single pending quantity the
/// calculator nets against the target. Negative line quantities are passed
/// through; the calculator clamps the sum at zero.
pub fn sum_pending_order_quantity(lines: &[PendingOrderLine]) -> f64 {
    lines.iter().map(|line| line.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::{sum_pending_order_quantity, PendingOrderLine};

    fn line(reference: &str, quantity: f64) -> PendingOrderLine {
        PendingOrderLine { reference: reference.to_string(), quantity }
    }

    #[test]
    fn sums_all_outstanding_lines() {
        let lines = vec![line("PO-1001", 12.0), line("PO-1002", 24.0), line("TR-88", 0.5)];
        assert_eq!(sum_pending_order_quantity(&lines), 36.5);
    }

    #[test]
    fn empty_line_set_sums_to_zero() {
        assert_eq!(sum_pending_order_quantity(&[]), 0.0);
    }

    #[test]
    fn negative_lines_are_not_clamped_here() {
        // Returns and corrections can show up as negative lines; clamping is
        // the calculator's job.
        let lines = vec![line("PO-2001", 10.0), line("RET-7", -4.0)];
        assert_eq!(sum_pending_order_quantity(&lines), 6.0);
    }
}
