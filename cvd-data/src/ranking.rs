//! Top-N countries by a cumulative metric.

use cvd_core::metric::{CaseMetric, Choice};
use cvd_core::records::{CountryDaily, CountryLatest};
use cvd_core::Result;
use cvd_db::Database;
use serde::Serialize;

/// The ranked countries and their daily history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopN {
    pub rank_metric: CaseMetric,
    /// Latest-snapshot rows, highest `rank_metric` first.
    pub ranked: Vec<CountryLatest>,
    /// Every daily row of the ranked countries, ordered by date then country.
    pub daily: Vec<CountryDaily>,
}

impl TopN {
    pub fn countries(&self) -> Vec<&str> {
        self.ranked.iter().map(|r| r.country.as_str()).collect()
    }
}

/// The `n` countries with the highest `rank_metric` in the latest snapshot.
///
/// Ties are broken by country name ascending. `n = 0` yields an empty
/// result; an `n` above the number of countries yields all of them.
pub fn top_n(db: &Database, n: usize, rank_metric: CaseMetric) -> Result<TopN> {
    let ranked = db.query_ranked_countries(rank_metric, n)?;
    let names: Vec<String> = ranked.iter().map(|r| r.country.clone()).collect();
    let daily = db.query_country_daily_for(&names)?;
    log::info!(
        "[CVD] query: top_n({}, {}) selected {:?}",
        n,
        rank_metric.label(),
        names
    );
    Ok(TopN {
        rank_metric,
        ranked,
        daily,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_db;
    use cvd_db::DatasetCsv;
    use std::collections::HashSet;

    #[test]
    fn top_ten_distinct_and_descending() {
        let db = sample_db();
        let top = top_n(&db, 10, CaseMetric::Confirmed).unwrap();
        assert_eq!(top.ranked.len(), 10);
        let distinct: HashSet<&str> = top.countries().into_iter().collect();
        assert_eq!(distinct.len(), 10);
        assert!(top
            .ranked
            .windows(2)
            .all(|w| w[0].confirmed >= w[1].confirmed));
        assert!(!distinct.contains("Poland"));
        assert!(!distinct.contains("China"));
        assert_eq!(top.daily.len(), 30);
        assert!(top.daily.iter().all(|r| distinct.contains(r.country.as_str())));
    }

    #[test]
    fn top_two_of_three() {
        let db = Database::from_csv(&DatasetCsv {
            daily_global: "Date,Confirmed,Deaths,Recovered,Active,New cases,New deaths,New recovered\n",
            country_daily: "Date,Country/Region,Confirmed,Deaths,Recovered,Active,WHO Region\n",
            country_latest: "Country/Region,Confirmed,Deaths,Recovered,Active\nUS,4290000,0,0,0\nIndia,1530000,0,0,0\nBrazil,2440000,0,0,0\n",
            country_demographic: "Country/Region,Population,TotalCases,TotalDeaths,TotalRecovered,WHO Region\n",
        })
        .unwrap();
        let top = top_n(&db, 2, CaseMetric::Confirmed).unwrap();
        assert_eq!(top.countries(), vec!["US", "Brazil"]);
        assert!(top.daily.is_empty());
    }

    #[test]
    fn zero_and_oversized_n() {
        let db = sample_db();
        let none = top_n(&db, 0, CaseMetric::Confirmed).unwrap();
        assert!(none.ranked.is_empty());
        assert!(none.daily.is_empty());
        let all = top_n(&db, 50, CaseMetric::Deaths).unwrap();
        assert_eq!(all.ranked.len(), 12);
        assert_eq!(all.ranked[0].country, "US");
        assert_eq!(all.ranked[1].country, "Brazil");
    }
}
