//!  EAN Hotel Agent
//!
//!  Copyright (C) 2026  The ean-hotel-agent authors
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Pagination lifecycle through the public surface: a list response drives
//! the session cursor, the cursor drives the next outgoing parameter set.

use chrono::NaiveDate;
use ean_hotel_agent::{HotelListQuery, SearchSession, list_request_parameters, parse_hotel_list};
use serde_json::json;

fn query() -> HotelListQuery {
    HotelListQuery::builder(
        "Seattle".to_string(),
        "US".to_string(),
        NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
        NaiveDate::from_ymd_opt(2026, 9, 14).unwrap(),
    )
    .build()
    .unwrap()
}

fn list_body(more_results_available: bool, with_tokens: bool) -> String {
    let mut response = json!({
        "customerSessionId": "sess-1",
        "moreResultsAvailable": more_results_available,
        "HotelList": {
            "@size": "1",
            "@activePropertyCount": "42",
            "HotelSummary": [
                {
                    "hotelId": 106347,
                    "name": "Grand Central Hotel",
                    "address1": "1208 1st Ave",
                    "city": "Seattle",
                    "hotelRating": 3.5
                }
            ]
        }
    });
    if with_tokens {
        response["cacheKey"] = json!("-4f3eb1a:13e37a8c0e5:-2f06");
        response["cacheLocation"] = json!("10.186.170.33:7300");
    }
    json!({ "HotelListResponse": response }).to_string()
}

#[test]
fn more_results_flag_with_tokens_enters_paging() {
    let mut session = SearchSession::new();
    parse_hotel_list(&list_body(true, true), &mut session).unwrap();
    assert!(session.paging());

    let parameters = list_request_parameters(&query(), &session);
    assert_eq!(
        parameters,
        vec![
            ("supplierType".to_string(), "E".to_string()),
            ("cacheKey".to_string(), "-4f3eb1a:13e37a8c0e5:-2f06".to_string()),
            ("cacheLocation".to_string(), "10.186.170.33:7300".to_string()),
        ]
    );
}

#[test]
fn exhausted_results_return_to_fresh() {
    let mut session = SearchSession::new();
    parse_hotel_list(&list_body(true, true), &mut session).unwrap();
    assert!(session.paging());

    // Final page: flag false, even though tokens were echoed back.
    parse_hotel_list(&list_body(false, true), &mut session).unwrap();
    assert!(!session.paging());

    let parameters = list_request_parameters(&query(), &session);
    assert!(parameters.iter().any(|(k, _)| k == "city"));
    assert!(!parameters.iter().any(|(k, _)| k == "cacheKey"));
    assert!(!parameters.iter().any(|(k, _)| k == "supplierType"));
}

#[test]
fn response_without_tokens_resets_to_fresh() {
    let mut session = SearchSession::new();
    parse_hotel_list(&list_body(true, true), &mut session).unwrap();
    parse_hotel_list(&list_body(true, false), &mut session).unwrap();
    assert!(!session.paging());
}

#[test]
fn reset_clears_paging_but_keeps_session_token() {
    let mut session = SearchSession::new();
    parse_hotel_list(&list_body(true, true), &mut session).unwrap();
    assert!(session.paging());
    assert_eq!(session.customer_session_id(), Some("sess-1"));

    session.reset();
    assert!(!session.paging());
    assert_eq!(session.customer_session_id(), Some("sess-1"));

    let parameters = list_request_parameters(&query(), &session);
    assert!(parameters.iter().any(|(k, _)| k == "arrivalDate"));
}

#[test]
fn unexpected_envelope_does_not_touch_existing_cursor() {
    let mut session = SearchSession::new();
    parse_hotel_list(&list_body(true, true), &mut session).unwrap();
    assert!(session.paging());

    // An unrecognized body is logged and skipped; the in-flight search can
    // still be resumed.
    parse_hotel_list(r#"{"SomethingElse": {}}"#, &mut session).unwrap();
    assert!(session.paging());
}
