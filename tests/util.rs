//! Shared test utilities for integration tests
//!
//! Provides common fixture creation and helper functions
//! used across multiple test files.

use assert_fs::prelude::*;

/// File names the fixture writes inside its temp directory.
pub const SCHOOLS_CSV: &str = "schools.csv";
pub const ARTICLES_CSV: &str = "articles.csv";

/// Create a small but representative dataset on disk.
///
/// Covers the tricky source shapes: legacy alias headers, currency
/// noise in fees, placeholder tokens, HTML line breaks, `有`/`無`
/// sentinel flags and a school name with irregular spacing that the
/// article table spells differently.
pub fn make_dataset_fixture() -> assert_fs::TempDir
{
    // Initialize the temporary data directory
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    // School table uses the legacy 學校類別1/學校類別2 headers so the
    // alias map is exercised on every load
    let schools = "\
學校名稱,區域,學校類別1,學校類別2,學生性別,宗教,教學語言,校網,學費,堂費,家長教師會費,校車,保姆車,一條龍中學,直屬中學,聯繫中學,小一全年測驗次數,小一全年考試次數,小二至小六全年測驗次數,小二至小六全年考試次數,多元學習評估,導修時段,碩士或以上學歷教師百分率,年資十年或以上教師百分率,特殊教育培訓教師百分率,地址,電話,創校年份
聖公會小學,九龍,資助,全日,男女,基督教,中文,41,\"$1,234 \",0,40,有,無,聖公會中學,-,-,0,0,2,1,有,無,48.5%,60,30,九龍塘<br>某街1號,12345678,1950
保良局小學,港島,私立,半日,女,-,英文,-,N/A,0,0,無,有,-,-,-,3,2,3,3,無,有,60,70,15,-,nan,1960
\"  ABC   Primary \",新界,直資,全日,男女,天主教,中英文,91,5000,300,50,無,無,-,ABC College,-,1,1,0,0,有,有,75,50,40,NT somewhere,87654321,1997
";

    // Article table spells the third school's name with different
    // irregular spacing; both sides canonicalize to "ABC Primary"
    let articles = "\
學校名稱,文章標題,文章連結
ABC Primary,ABC Primary admissions guide,https://example.com/abc-admissions
ABC   Primary,Open day report,https://example.com/abc-open-day
聖公會小學,升學攻略,https://example.com/skh
";

    tmp.child(SCHOOLS_CSV)
        .write_str(schools)
        .expect("write schools csv");

    tmp.child(ARTICLES_CSV)
        .write_str(articles)
        .expect("write articles csv");

    tmp
}
