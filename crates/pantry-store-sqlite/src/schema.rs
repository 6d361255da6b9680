//! SQL schema for the Pantry SQLite store.
//!
//! Executed once at connection startup. The full-text tables are not part of
//! it: they are created by the search-index refresh so that a build without
//! FTS5 can still import.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- ── FoodData Central ────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS fdc_food_category (
    id          INTEGER PRIMARY KEY,
    code        TEXT NOT NULL,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS fdc_nutrient (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    unit_name    TEXT NOT NULL,
    nutrient_nbr TEXT,
    rank         REAL
);

CREATE TABLE IF NOT EXISTS fdc_measure_unit (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS fdc_food (
    fdc_id           INTEGER PRIMARY KEY,
    data_type        TEXT NOT NULL,
    description      TEXT NOT NULL,
    food_category_id INTEGER REFERENCES fdc_food_category(id),
    publication_date TEXT,           -- ISO 8601 date
    search_vector    TEXT            -- derived; rebuilt by the index refresh
);

-- Several rows per (food, nutrient) are legitimate; `id` is the source's
-- surrogate key.
CREATE TABLE IF NOT EXISTS fdc_food_nutrient (
    id                  INTEGER PRIMARY KEY,
    fdc_id              INTEGER NOT NULL REFERENCES fdc_food(fdc_id),
    nutrient_id         INTEGER NOT NULL REFERENCES fdc_nutrient(id),
    amount              REAL,
    data_points         INTEGER,
    derivation_id       INTEGER,
    min                 REAL,
    max                 REAL,
    median              REAL,
    loq                 TEXT,
    footnote            TEXT,
    min_year_acquired   INTEGER,
    percent_daily_value REAL
);

CREATE TABLE IF NOT EXISTS fdc_food_portion (
    id                  INTEGER PRIMARY KEY,
    fdc_id              INTEGER NOT NULL REFERENCES fdc_food(fdc_id),
    seq_num             INTEGER,
    amount              REAL,
    measure_unit_id     INTEGER REFERENCES fdc_measure_unit(id),
    portion_description TEXT,
    modifier            TEXT,
    gram_weight         REAL,
    data_points         INTEGER,
    footnote            TEXT,
    min_year_acquired   INTEGER
);

CREATE TABLE IF NOT EXISTS fdc_branded_food (
    fdc_id                      INTEGER PRIMARY KEY REFERENCES fdc_food(fdc_id),
    brand_owner                 TEXT,
    brand_name                  TEXT,
    subbrand_name               TEXT,
    gtin_upc                    TEXT,
    ingredients                 TEXT,
    not_a_significant_source_of TEXT,
    serving_size                REAL,
    serving_size_unit           TEXT,
    household_serving_fulltext  TEXT,
    branded_food_category       TEXT,
    data_source                 TEXT,
    package_weight              TEXT,
    modified_date               TEXT,
    available_date              TEXT,
    market_country              TEXT,
    discontinued_date           TEXT,
    preparation_state_code      TEXT,
    trade_channel               TEXT,
    short_description           TEXT
);

CREATE TABLE IF NOT EXISTS fdc_foundation_food (
    fdc_id     INTEGER PRIMARY KEY REFERENCES fdc_food(fdc_id),
    ndb_number INTEGER,
    footnote   TEXT
);

CREATE TABLE IF NOT EXISTS fdc_sr_legacy_food (
    fdc_id     INTEGER PRIMARY KEY REFERENCES fdc_food(fdc_id),
    ndb_number INTEGER
);

CREATE TABLE IF NOT EXISTS fdc_survey_fndds_food (
    fdc_id              INTEGER PRIMARY KEY REFERENCES fdc_food(fdc_id),
    food_code           INTEGER,
    wweia_category_code INTEGER,
    start_date          TEXT,
    end_date            TEXT
);

CREATE INDEX IF NOT EXISTS fdc_food_data_type_idx      ON fdc_food(data_type);
CREATE INDEX IF NOT EXISTS fdc_food_category_idx       ON fdc_food(food_category_id);
CREATE INDEX IF NOT EXISTS fdc_food_nutrient_food_idx  ON fdc_food_nutrient(fdc_id, nutrient_id);
CREATE INDEX IF NOT EXISTS fdc_food_nutrient_nutr_idx  ON fdc_food_nutrient(nutrient_id);
CREATE INDEX IF NOT EXISTS fdc_food_portion_food_idx   ON fdc_food_portion(fdc_id);
CREATE INDEX IF NOT EXISTS fdc_branded_food_gtin_idx   ON fdc_branded_food(gtin_upc);
CREATE INDEX IF NOT EXISTS fdc_branded_food_owner_idx  ON fdc_branded_food(brand_owner);

-- ── Child Nutrition ─────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS cn_food_category (
    code          INTEGER PRIMARY KEY,
    description   TEXT NOT NULL,
    date_added    TEXT,
    last_modified TEXT
);

CREATE TABLE IF NOT EXISTS cn_nutrient (
    code               INTEGER PRIMARY KEY,
    description        TEXT NOT NULL,
    description_abbrev TEXT,
    unit               TEXT NOT NULL,
    date_added         TEXT,
    last_modified      TEXT
);

CREATE TABLE IF NOT EXISTS cn_gpc_name (
    gpc_code        TEXT PRIMARY KEY,
    gpc_description TEXT NOT NULL,
    date_added      TEXT,
    last_modified   TEXT
);

CREATE TABLE IF NOT EXISTS cn_food (
    cn_code                INTEGER PRIMARY KEY,
    food_category_code     INTEGER REFERENCES cn_food_category(code),
    descriptor             TEXT NOT NULL,
    abbreviated_descriptor TEXT NOT NULL,
    gtin                   TEXT,
    product_code           TEXT,
    brand_owner_name       TEXT,
    brand_name             TEXT,
    fns_material_number    TEXT,
    source_code            INTEGER,
    date_added             TEXT,
    last_modified          TEXT,
    discontinued_date      TEXT,
    form_of_food           TEXT,
    fdc_id                 INTEGER,  -- cross-reference, deliberately unchecked
    gpc_product_code       TEXT REFERENCES cn_gpc_name(gpc_code),
    search_vector          TEXT
);

CREATE TABLE IF NOT EXISTS cn_nutrient_value (
    id              INTEGER PRIMARY KEY,
    cn_code         INTEGER NOT NULL REFERENCES cn_food(cn_code),
    nutrient_code   INTEGER NOT NULL REFERENCES cn_nutrient(code),
    nutrient_value  REAL NOT NULL,
    per_unit        TEXT NOT NULL DEFAULT '100g',
    value_type_code INTEGER,
    source_code     INTEGER,
    date_added      TEXT,
    last_modified   TEXT,
    UNIQUE (cn_code, nutrient_code)
);

CREATE TABLE IF NOT EXISTS cn_weight (
    id                  INTEGER PRIMARY KEY,
    cn_code             INTEGER NOT NULL REFERENCES cn_food(cn_code),
    sequence_num        INTEGER NOT NULL,
    amount              REAL NOT NULL,
    measure_description TEXT NOT NULL,
    unit_amount         REAL NOT NULL,
    type_of_unit        TEXT NOT NULL,
    source_code         INTEGER,
    date_added          TEXT,
    last_modified       TEXT,
    UNIQUE (cn_code, sequence_num)
);

CREATE INDEX IF NOT EXISTS cn_food_category_idx      ON cn_food(food_category_code);
CREATE INDEX IF NOT EXISTS cn_food_gtin_idx          ON cn_food(gtin);
CREATE INDEX IF NOT EXISTS cn_food_fdc_idx           ON cn_food(fdc_id);
CREATE INDEX IF NOT EXISTS cn_nutrient_value_nut_idx ON cn_nutrient_value(nutrient_code);

PRAGMA user_version = 1;
";
