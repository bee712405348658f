//! Response shapes for the three read-only TMDB endpoints the pipeline
//! uses: find-by-external-id, movie details and movie credits.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct FindResponse {
    #[serde(default)]
    pub movie_results: Vec<FindMovie>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindMovie {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MovieDetails {
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Genre {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Credits {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CrewMember {
    pub job: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_deserialization() {
        let json = r#"{
            "title": "Amélie",
            "release_date": "2001-04-25",
            "poster_path": "/amelie.jpg",
            "vote_average": 7.9,
            "genres": [{"id": 35, "name": "Comedy"}, {"id": 10749, "name": "Romance"}],
            "production_countries": [
                {"iso_3166_1": "FR", "name": "France"},
                {"iso_3166_1": "DE", "name": "Germany"}
            ]
        }"#;
        let details: MovieDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.title.as_deref(), Some("Amélie"));
        assert_eq!(details.production_countries.len(), 2);
        assert_eq!(details.production_countries[0].iso_3166_1, "FR");
    }

    #[test]
    fn test_find_response_tolerates_missing_results() {
        let find: FindResponse = serde_json::from_str(r#"{"tv_results": []}"#).unwrap();
        assert!(find.movie_results.is_empty());
    }
}
