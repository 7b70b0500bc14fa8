use std::path::Path;

use miette::Result;

pub fn exec(dir: &Path) -> Result<()> {
    stagehand_ops::ops_verify::verify(dir)
}
