pub mod achievements;
pub mod suggestions;
pub mod tips;

pub use achievements::{ACHIEVEMENTS, Achievement, evaluate, newly_unlocked};
pub use suggestions::{GoalSuggestion, TrendDirection, suggest_goal};
pub use tips::{TIPS, Tip, TipCategory, visible_tips};
