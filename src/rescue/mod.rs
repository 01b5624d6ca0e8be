//! Rescue evaluator.
//!
//! Every tick, each location with victims is checked against the current
//! resource deployment:
//!
//! | Access      | Locations              | Needs                                        |
//! |-------------|------------------------|----------------------------------------------|
//! | High access | F3, F4                 | ladder there, plus an ambulance there (strict) |
//! | Standard    | F1, F2, wings, lobby   | an ambulance there                           |
//! | Exterior    | EXT                    | ambulance there, police holding the route, EXT not blocked |
//!
//! Eligible locations give up at most `rescue_cap` victims per tick. Credit
//! is shared by every team with a resource at the location.

mod evaluator;

pub use evaluator::{RescueEvaluator, RescueRecord, RescueReport};
