pub mod providers;
pub mod recommender;
