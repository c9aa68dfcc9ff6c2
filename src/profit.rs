use log::debug;

use crate::bus_line::{AssessedLine, BusLine};

pub const COST_PER_KM: f64 = 2.50;
pub const ADULT_FARE: f64 = 12.00;
pub const STUDENT_FARE: f64 = 8.00;
pub const SENIOR_FARE: f64 = 5.00;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitBreakdown {
    pub revenue: f64,
    pub subsidy: f64,
    pub cost: f64,
}

impl ProfitBreakdown {
    pub fn of(line: &BusLine) -> Self {
        let passengers = &line.passengers;
        let senior_revenue = if line.subsidy_level.seniors_pay() {
            passengers.senior as f64 * SENIOR_FARE
        } else {
            0.0
        };
        ProfitBreakdown {
            revenue: passengers.adult as f64 * ADULT_FARE
                + passengers.student as f64 * STUDENT_FARE
                + senior_revenue,
            subsidy: line.route_length * line.subsidy_level.rate(),
            cost: line.route_length * COST_PER_KM,
        }
    }

    pub fn profit(&self) -> f64 {
        self.revenue + self.subsidy - self.cost
    }
}

pub fn profit(line: &BusLine) -> f64 {
    let breakdown = ProfitBreakdown::of(line);
    debug!(
        "Line {}: revenue {:.2} + subsidy {:.2} - cost {:.2}",
        line.line_number, breakdown.revenue, breakdown.subsidy, breakdown.cost
    );
    breakdown.profit()
}

pub fn calculate_profitability(lines: Vec<BusLine>) -> Vec<AssessedLine> {
    lines
        .into_iter()
        .map(|line| AssessedLine {
            profit: profit(&line),
            line,
        })
        .collect()
}
