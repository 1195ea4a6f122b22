use crate::types::{Rating, RatingRecord, Thresholds};

const IMDB_SOURCE: &str = "imdb";

pub fn imdb_rating(record: &RatingRecord) -> Option<&Rating> {
    record.ratings.iter().find(|r| r.source == IMDB_SOURCE)
}

/// A title is included when its IMDb rating has both a score and a vote count
/// and either one meets its threshold. Any missing piece excludes it.
pub fn should_include(record: Option<&RatingRecord>, thresholds: &Thresholds) -> bool {
    let Some(rating) = record.and_then(imdb_rating) else {
        return false;
    };

    match (rating.score, rating.votes) {
        (Some(score), Some(votes)) => {
            score >= thresholds.min_rating || votes >= thresholds.min_votes as f64
        }
        _ => false,
    }
}
