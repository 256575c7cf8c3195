mod housing;
mod influence;
mod reset;

pub use housing::HousingSystem;
pub use influence::InfluenceSystem;
pub use reset::ResetSystem;
