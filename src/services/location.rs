//! Maps a free-text (mostly Korean) address to the city name the weather
//! service understands.
//!
//! The table only covers major cities and provinces; anything unrecognised
//! resolves to [`DEFAULT_LOCATION`].

pub const DEFAULT_LOCATION: &str = "Seoul";

// Cities come before provinces so "경상남도 창원시" resolves to Changwon.
const CITY_TOKENS: &[(&str, &str)] = &[
    ("서울", "Seoul"),
    ("부산", "Busan"),
    ("대구", "Daegu"),
    ("인천", "Incheon"),
    ("광주", "Gwangju"),
    ("대전", "Daejeon"),
    ("울산", "Ulsan"),
    ("세종", "Sejong"),
    ("수원", "Suwon"),
    ("성남", "Seongnam"),
    ("고양", "Goyang"),
    ("용인", "Yongin"),
    ("창원", "Changwon"),
    ("청주", "Cheongju"),
    ("전주", "Jeonju"),
    ("천안", "Cheonan"),
    ("포항", "Pohang"),
    ("춘천", "Chuncheon"),
    ("강릉", "Gangneung"),
    ("제주", "Jeju"),
    ("경기", "Suwon"),
    ("강원", "Chuncheon"),
    ("충청북", "Cheongju"),
    ("충북", "Cheongju"),
    ("충청남", "Cheonan"),
    ("충남", "Cheonan"),
    ("전라북", "Jeonju"),
    ("전북", "Jeonju"),
    ("전라남", "Mokpo"),
    ("전남", "Mokpo"),
    ("경상북", "Pohang"),
    ("경북", "Pohang"),
    ("경상남", "Changwon"),
    ("경남", "Changwon"),
    ("seoul", "Seoul"),
    ("busan", "Busan"),
    ("daegu", "Daegu"),
    ("incheon", "Incheon"),
    ("gwangju", "Gwangju"),
    ("daejeon", "Daejeon"),
    ("ulsan", "Ulsan"),
    ("sejong", "Sejong"),
    ("suwon", "Suwon"),
    ("jeju", "Jeju"),
];

pub fn resolve_location_token(address: &str) -> &'static str {
    let lowered = address.to_lowercase();
    CITY_TOKENS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, token)| *token)
        .unwrap_or(DEFAULT_LOCATION)
}
