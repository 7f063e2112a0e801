#![allow(dead_code)]

use bson::{Document, doc};
use tours_collection::{MemoryCollection, ToursService};
use tours_query::{QueryShaper, ShaperConfig};

/// 2021-01-01T00:00:00Z
const BASE_MILLIS: i64 = 1_609_459_200_000;

fn created(day: i64) -> bson::DateTime {
    bson::DateTime::from_millis(BASE_MILLIS + day * 86_400_000)
}

/// Nine tours. "The Sea Explorer" and "The Park Camper" share a creation
/// time so the default sort has to fall back to `_id`.
pub fn tours() -> Vec<Document> {
    vec![
        doc! { "_id": "t1", "name": "The Forest Hiker", "duration": 5, "difficulty": "easy", "price": 397, "ratingsAverage": 4.7, "summary": "Breathtaking hike through the Canadian Banff National Park", "createdAt": created(1) },
        doc! { "_id": "t2", "name": "The Sea Explorer", "duration": 7, "difficulty": "medium", "price": 497, "ratingsAverage": 4.8, "summary": "Exploring the jaw-dropping US east coast by foot and by boat", "createdAt": created(5) },
        doc! { "_id": "t3", "name": "The Snow Adventurer", "duration": 4, "difficulty": "difficult", "price": 997, "ratingsAverage": 4.5, "summary": "Exciting adventure in the snow with snowboarding and skiing", "createdAt": created(3) },
        doc! { "_id": "t4", "name": "The City Wanderer", "duration": 9, "difficulty": "easy", "price": 1197, "ratingsAverage": 4.6, "summary": "Living the life of Wanderlust in the US' most beatiful cities", "createdAt": created(4) },
        doc! { "_id": "t5", "name": "The Park Camper", "duration": 10, "difficulty": "medium", "price": 1497, "ratingsAverage": 4.9, "summary": "Breathing in Nature in America's most spectacular National Parks", "createdAt": created(5) },
        doc! { "_id": "t6", "name": "The Sports Lover", "duration": 14, "difficulty": "difficult", "price": 2997, "ratingsAverage": 4.7, "summary": "Surfing, skating, parajumping, rock climbing and more, all in one tour", "createdAt": created(6) },
        doc! { "_id": "t7", "name": "The Wine Taster", "duration": 8, "difficulty": "easy", "price": 1997, "ratingsAverage": 4.5, "summary": "Exquisite wines, scenic views, exclusive barrel tastings, and much more", "createdAt": created(7) },
        doc! { "_id": "t8", "name": "The Star Gazer", "duration": 9, "difficulty": "medium", "price": 2997, "ratingsAverage": 4.7, "summary": "The most remote and stunningly beautiful places for seeing the night sky", "createdAt": created(8) },
        doc! { "_id": "t9", "name": "The Northern Lights", "duration": 3, "difficulty": "easy", "price": 1497, "ratingsAverage": 4.9, "summary": "Enjoy the Northern Lights in one of the best places in the world", "createdAt": created(2) },
    ]
}

pub fn seeded_collection() -> MemoryCollection {
    let collection = MemoryCollection::new().with_hidden_fields(["password"]);
    collection.insert_many(tours()).unwrap();
    collection
}

pub fn service() -> ToursService<MemoryCollection> {
    ToursService::new(seeded_collection(), QueryShaper::new(ShaperConfig::default()))
}

pub fn empty_service() -> ToursService<MemoryCollection> {
    ToursService::new(MemoryCollection::new(), QueryShaper::default())
}

pub fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.get_str("_id").unwrap()).collect()
}
