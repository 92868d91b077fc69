use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use iogen::adapters::csv_tags::{CsvTagSource, LEGACY_DELIMITER};
use iogen::adapters::l5x::L5xTagSource;
use iogen::adapters::render::cspt::render_cspt;
use iogen::adapters::render::grid::render_grid;
use iogen::adapters::render::xlsx::{write_xlsx, XlsxMeta};
use iogen::adapters::render::{display_name, GridLayout};
use iogen::{IngestService, IoMap, IoSession, ParseOutcome, SourceError, SubstitutionTable};
use uuid::Uuid;

fn temp_path(ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!("iogen-it-{}.{}", Uuid::new_v4(), ext))
}

const CSV_EXPORT: &str = "\
remark,\"CSV-Import-Export\"
0.3
TYPE,SCOPE,NAME,DESCRIPTION,DATATYPE,SPECIFIER,ATTRIBUTES
ALIAS,,iFT101,\"desc\",\"\",\"RIO1:3:I.Data.5\",\"(RADIX := Float)\"
ALIAS,,oXV200,\"desc2\",\"\",\"RIO1:3:O.Ch6Data\",\"(RADIX := Decimal)\"
ALIAS,,iLS7,\"Level\",\"\",\"FLEX1:I.Data[2].7\",\"\"
ALIAS,,iFT101_F,\"\",\"\",\"RIO1:3:I.Ch5Fault\",\"\"
ALIAS,,iCFG,\"\",\"\",\"RIO1:3:C.Ch0Config.HighEngineering\",\"\"
TAG,,Setpoint,\"\",\"REAL\",\"\",\"\"
";

#[test]
fn csv_export_end_to_end() {
    let input = temp_path("csv");
    fs::write(&input, CSV_EXPORT).unwrap();

    let mut map = IoMap::new();
    let report = IngestService::default()
        .ingest(CsvTagSource::new(&input), &mut map)
        .unwrap();
    let _ = fs::remove_file(&input);

    assert_eq!(report.total, 5);
    assert_eq!(report.resolved, 3);
    assert_eq!(report.skipped.get(ParseOutcome::ServiceField), 2);
    assert_eq!(report.collisions, 0);

    assert_eq!(map.get("RIO1", 3, 5), Some("iFT101"));
    assert_eq!(map.get("RIO1", 3, 6), Some("oXV200"));
    assert_eq!(map.get("FLEX1", 2, 7), Some("iLS7"));
    assert_eq!(map.description("RIO1", 3, 6), Some("desc2"));
    assert_eq!(display_name(&map, "RIO1", 3, 5), "FT-101");
    assert_eq!(display_name(&map, "RIO1", 3, 6), "XV-200");

    let created = NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();
    let listing = render_cspt(&map, ',', &created);
    assert!(listing.contains("RIO1,3,5,FT-101\n"));
    assert!(listing.contains("RIO1,3,6,XV-200\n"));
    assert!(listing.contains("FLEX1,2,7,LS-7\n"));

    let grid = render_grid(&map, GridLayout::default(), &created);
    assert!(grid.contains("CHASSIS RIO1"));
    assert!(grid.contains("XV-200"));

    let out = temp_path("xlsx");
    let meta = XlsxMeta {
        created,
        source_name: "export.csv".to_string(),
        slots: 10,
    };
    assert_eq!(write_xlsx(&map, &out, &meta).unwrap(), 0);
    assert!(fs::metadata(&out).unwrap().len() > 0);
    let _ = fs::remove_file(&out);
}

#[test]
fn legacy_export_with_substitution_rules() {
    let input = temp_path("csv");
    fs::write(
        &input,
        "ALIAS??iPT1?\"$0414$0430$0432\"??Local:4:I.Data.1\nALIAS??iPT2???RIO2:1:I.Data.0\n",
    )
    .unwrap();
    let rules = temp_path("txt");
    fs::write(&rules, "# remap local rack\nLocal:4: RIO9:4:\n").unwrap();

    let table = SubstitutionTable::load(&rules).unwrap();
    let mut map = IoMap::new();
    let report = IngestService::new(table)
        .ingest(
            CsvTagSource::new(&input).with_delimiter(LEGACY_DELIMITER),
            &mut map,
        )
        .unwrap();
    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&rules);

    assert_eq!(report.resolved, 2);
    assert_eq!(report.substituted, 1);
    assert_eq!(map.get("RIO9", 4, 1), Some("iPT1"));
    assert_eq!(map.description("RIO9", 4, 1), Some("Дав"));
    assert_eq!(map.get("RIO2", 1, 0), Some("iPT2"));
}

#[test]
fn l5x_project_through_session() {
    let input = temp_path("L5X");
    fs::write(
        &input,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<RSLogix5000Content>
<Controller Name="PLC01">
<Tags>
<Tag Name="iFT101" TagType="Alias" AliasFor="RIO1:3:I.Data.5">
<Description><![CDATA[Flow$Nmain]]></Description>
</Tag>
<Tag Name="iFT101_ST" TagType="Alias" AliasFor="RIO1:3:I.Status"/>
</Tags>
<Programs>
<Program Name="Valves">
<Tags>
<Tag Name="oXV200" TagType="Alias" AliasFor="RIO1:3:O.Ch6Data"/>
</Tags>
</Program>
</Programs>
</Controller>
</RSLogix5000Content>
"#,
    )
    .unwrap();

    let session = IoSession::new(IngestService::default());
    let report = session
        .spawn_ingest(L5xTagSource::new(&input))
        .join()
        .unwrap()
        .unwrap();
    let _ = fs::remove_file(&input);

    assert_eq!(report.total, 3);
    assert_eq!(report.resolved, 2);
    assert_eq!(report.skipped.get(ParseOutcome::ServiceField), 1);
    session.read(|map| {
        assert_eq!(display_name(map, "RIO1", 3, 5), "FT-101");
        assert_eq!(display_name(map, "RIO1", 3, 6), "XV-200");
        assert_eq!(map.description("RIO1", 3, 5), Some("Flow\nmain"));
    });

    session.reset();
    assert!(session.read(IoMap::is_empty));
}

#[test]
fn unreadable_source_aborts_the_run() {
    let session = IoSession::default();
    let result = session.ingest(CsvTagSource::new(temp_path("csv")));
    assert!(matches!(result, Err(SourceError::Io { .. })));
    assert!(session.read(IoMap::is_empty));
}
