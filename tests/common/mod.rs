use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CENSUS: &str = "\
POA_CODE_2021,Tot_P_M,Tot_P_F,Tot_P_P
POA2000,4500,4500,9000
POA2500,0,0,0
POA2600,500,500,1000
POA3000,1000,1000,2000
";

pub const FIREARMS: &str = "\
POSTCODE,FIREARMS
2000,45
2999,10
2500,3
2600,20
3000,7
";

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_firearms(FIREARMS)
    }

    pub fn with_firearms(firearms: &str) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();

        write(
            &root.join(
                "data/raw/2021_GCP_POA_for_NSW_short-header/\
                 2021 Census GCP Postal Areas for NSW/2021Census_G01_NSW_POA.csv",
            ),
            CENSUS,
        );
        write(&root.join("data/raw/postcode_firearms.csv"), firearms);
        write(
            &root.join("data/raw/poa_2021/POA_2021_AUST_GDA2020.geojson"),
            &boundaries(&["2000", "2500", "2600", "2999", "3000"]).to_string(),
        );

        Self { _tmp: tmp, root }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("poamap").expect("poamap binary");
        cmd.arg("--root").arg(&self.root).env("RUST_LOG", "warn");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> String {
        let out = self
            .cmd()
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(out).expect("utf8 stdout")
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("read output")
    }
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create fixture dir");
    fs::write(path, contents).expect("write fixture");
}

/// One 0.1 degree square per postcode, laid out along a row.
pub fn boundaries(codes: &[&str]) -> Value {
    let features: Vec<Value> = codes
        .iter()
        .enumerate()
        .map(|(i, code)| {
            let x = 150.0 + i as f64 * 0.1;
            let y = -33.9;
            json!({
                "type": "Feature",
                "properties": { "POA_CODE21": code, "AREASQKM21": 1.0 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, y], [x + 0.1, y], [x + 0.1, y + 0.1], [x, y + 0.1], [x, y]]]
                }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}
