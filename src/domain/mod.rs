// Domain layer: the company value object, match decisions, golden records and
// the ports the matching pipeline depends on.

pub mod company;
pub mod decision;
pub mod golden_record;
pub mod linker;
pub mod ports;
