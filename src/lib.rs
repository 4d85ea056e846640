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

// Library for ean-hotel-agent
// Signed REST client for the EAN hotel booking API (list, info, room images, availability)

mod hotels_client;
mod hotels_query_builder;
mod hotels_results_parser;
mod hotels_session;
mod signature;

// Re-export hotels_client
pub use hotels_client::EanHotelsClient;

// Re-export hotels_query_builder
pub use hotels_query_builder::{
    AvailabilityQuery, HotelListQuery, HotelListQueryBuilder, distribute_adults,
    list_request_parameters,
};

// Re-export hotels_results_parser
pub use hotels_results_parser::{
    Hotel, Room, parse_hotel_info, parse_hotel_list, parse_room_availability, parse_room_images,
};

// Re-export hotels_session
pub use hotels_session::SearchSession;

// Re-export signature
pub use signature::{Credentials, signature};
