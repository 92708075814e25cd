//! Row-wise hypothesis tests.


pub use anova::{test_anova, AnovaResult, AnovaResultSingle};
