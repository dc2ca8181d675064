use crate::answer::Level;
use crate::catalog::{CatalogError, FeatureCatalog};
use crate::feature::{Feature, LatLng};
use crate::flow::{FlowError, Question, QuizFlow};

fn path(points: &[(f64, f64)]) -> Vec<LatLng> {
    points
        .iter()
        .map(|&(lat, lng)| LatLng::new(lat, lng))
        .collect()
}

fn demo_features() -> Vec<Feature> {
    vec![
        Feature::station(
            "Station 15",
            &["station15"],
            LatLng::new(38.99977193334477, -77.40212301984256),
        ),
        Feature::station(
            "Station 25",
            &["station25"],
            LatLng::new(39.04836001989688, -77.38233103483765),
        ),
        Feature::station(
            "Station 35",
            &["station35"],
            LatLng::new(39.03007633604696, -77.43296606488684),
        ),
        Feature::road(
            "Rt 7 (Harry Byrd Hwy)",
            &["rt7", "route7"],
            vec![path(&[
                (39.0118, -77.5250),
                (39.0165, -77.4870),
                (39.0205, -77.4510),
                (39.0232, -77.4190),
                (39.0255, -77.3870),
                (39.0281, -77.3450),
            ])],
        ),
        Feature::road(
            "Algonkian Parkway",
            &["algonkianparkway", "algonkianpkwy"],
            vec![path(&[
                (39.0535, -77.4200),
                (39.0498, -77.4010),
                (39.0462, -77.3830),
                (39.0440, -77.3620),
            ])],
        ),
        Feature::road(
            "Sterling Blvd",
            &["sterlingblvd", "sterlingboulevard"],
            vec![path(&[
                (39.0068, -77.4290),
                (39.0082, -77.4150),
                (39.0101, -77.4020),
                (39.0124, -77.3880),
            ])],
        ),
        Feature::road(
            "Church Road",
            &["churchroad", "churchrd"],
            vec![path(&[
                (39.0105, -77.4275),
                (39.0165, -77.4160),
                (39.0232, -77.4050),
                (39.0290, -77.3970),
            ])],
        ),
        Feature::road(
            "Rt 28 (Sully Road)",
            &["rt28", "route28", "sullyroad", "sullyrd"],
            vec![path(&[
                (39.0030, -77.4420),
                (39.0160, -77.4395),
                (39.0290, -77.4360),
                (39.0400, -77.4330),
            ])],
        ),
        Feature::road(
            "Cascades Parkway",
            &["cascadesparkway", "cascadespkwy"],
            vec![path(&[
                (39.0245, -77.3935),
                (39.0340, -77.3905),
                (39.0440, -77.3880),
                (39.0520, -77.3860),
            ])],
        ),
        Feature::road(
            "Atlantic Blvd",
            &["atlanticblvd", "atlanticboulevard"],
            vec![path(&[
                (39.0170, -77.4300),
                (39.0260, -77.4270),
                (39.0350, -77.4235),
            ])],
        ),
        Feature::road(
            "Potomac View Road",
            &["potomacviewroad", "potomacviewrd"],
            vec![path(&[
                (39.0290, -77.4080),
                (39.0360, -77.4050),
                (39.0430, -77.4030),
            ])],
        ),
        Feature::road(
            "Nokes Blvd",
            &["nokesblvd", "nokesboulevard"],
            vec![path(&[
                (39.0130, -77.4390),
                (39.0190, -77.4230),
                (39.0240, -77.4120),
            ])],
        ),
        Feature::road(
            "Loudoun County Pkwy",
            &["loudouncountypkwy", "loudouncountyparkway"],
            vec![
                path(&[(39.0090, -77.5050), (39.0200, -77.4930), (39.0330, -77.4840)]),
                path(&[(39.0330, -77.4840), (39.0420, -77.4720), (39.0470, -77.4560)]),
            ],
        ),
        Feature::road(
            "Russell Branch Pkwy",
            &["russellbranchpkwy", "russellbranchparkway"],
            vec![path(&[
                (39.0300, -77.4800),
                (39.0335, -77.4650),
                (39.0360, -77.4500),
            ])],
        ),
        Feature::road(
            "Pacific Blvd",
            &["pacificblvd", "pacificboulevard"],
            vec![path(&[
                (39.0110, -77.4520),
                (39.0230, -77.4480),
                (39.0360, -77.4440),
                (39.0450, -77.4420),
            ])],
        ),
    ]
}

pub fn demo_catalog() -> Result<FeatureCatalog, CatalogError> {
    FeatureCatalog::new(demo_features())
}

pub fn demo_questions() -> Result<Vec<Question>, CatalogError> {
    let catalog = demo_catalog()?;

    Ok(vec![
        Question {
            level: Level::Selection,
            catalog: catalog.clone(),
        },
        Question {
            level: Level::FreeText,
            catalog,
        },
    ])
}

pub fn demo_flow() -> Result<QuizFlow, FlowError> {
    QuizFlow::new(demo_questions()?)
}
