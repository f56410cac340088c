/// Station names with their long-run mean temperature in degrees Celsius.
pub const DEFAULT_STATIONS: &[(&str, f64)] = &[
    ("Abha", 18.0),
    ("Abidjan", 26.0),
    ("Accra", 26.4),
    ("Addis Ababa", 16.0),
    ("Adelaide", 17.3),
    ("Albuquerque", 14.0),
    ("Alexandria", 20.0),
    ("Amsterdam", 10.2),
    ("Anchorage", 2.8),
    ("Ankara", 12.0),
    ("Athens", 19.2),
    ("Auckland", 15.2),
    ("Baghdad", 22.77),
    ("Bangkok", 28.6),
    ("Barcelona", 18.2),
    ("Beijing", 12.9),
    ("Berlin", 10.3),
    ("Bogotá", 13.2),
    ("Boston", 10.9),
    ("Brussels", 10.5),
    ("Budapest", 11.3),
    ("Buenos Aires", 18.0),
    ("Cairo", 21.4),
    ("Cape Town", 16.2),
    ("Chicago", 9.8),
    ("Copenhagen", 9.1),
    ("Dakar", 24.0),
    ("Dhaka", 25.9),
    ("Dubai", 26.9),
    ("Dublin", 9.8),
    ("Edinburgh", 9.3),
    ("Helsinki", 5.9),
    ("Hong Kong", 23.3),
    ("Istanbul", 13.9),
    ("Jakarta", 26.7),
    ("Johannesburg", 15.5),
    ("Kathmandu", 18.3),
    ("Lagos", 26.8),
    ("Lima", 19.2),
    ("Lisbon", 17.5),
    ("London", 11.3),
    ("Madrid", 15.0),
    ("Manila", 28.4),
    ("Mexico City", 17.5),
    ("Moscow", 5.8),
    ("Mumbai", 27.1),
    ("Nairobi", 17.8),
    ("New York City", 12.9),
    ("Oslo", 5.7),
    ("Paris", 12.3),
    ("Reykjavík", 4.3),
    ("Rome", 15.2),
    ("Santiago", 14.7),
    ("São Paulo", 19.7),
    ("Seoul", 12.5),
    ("Singapore", 27.0),
    ("Stockholm", 6.6),
    ("Sydney", 17.7),
    ("Tokyo", 15.4),
    ("Toronto", 9.4),
    ("Ulaanbaatar", -0.4),
    ("Vancouver", 10.4),
    ("Vienna", 10.4),
    ("Warsaw", 8.5),
    ("Yakutsk", -8.8),
    ("Zürich", 9.3),
];
