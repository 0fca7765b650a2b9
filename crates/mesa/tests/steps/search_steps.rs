use crate::MesaWorld;
use crate::steps::place;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use mesa::search::PagedResults;
use mesa_api::FilterSet;

#[given("the catalog contains:")]
async fn catalog(world: &mut MesaWorld, step: &Step) {
    let table = step.table.as_ref().expect("catalog table");
    for row in table.rows.iter().skip(1) {
        let mut entry = place(&row[0]);
        entry.name = row[1].clone();
        entry.rating = row[2].parse().ok();
        entry.price_level = row[3].parse().ok();
        world.harness.gateway.insert(entry);
    }
}

async fn run_search(world: &mut MesaWorld, filters: FilterSet) {
    world.results = world.harness.app.search().search(&filters).await.unwrap();
}

#[when(regex = r#"^I search for "([^"]+)"$"#)]
async fn search_for(world: &mut MesaWorld, query: String) {
    run_search(world, FilterSet::default().with_query(query)).await;
}

#[when(regex = r#"^I search for "([^"]+)" with minimum rating ([\d.]+)$"#)]
async fn search_with_min_rating(world: &mut MesaWorld, query: String, min_rating: f64) {
    run_search(
        world,
        FilterSet::default()
            .with_query(query)
            .with_min_rating(min_rating),
    )
    .await;
}

#[when(regex = r#"^I search for "([^"]+)" with price levels "([\d,]+)"$"#)]
async fn search_with_price_levels(world: &mut MesaWorld, query: String, levels: String) {
    let levels: Vec<u8> = levels
        .split(',')
        .map(|level| level.trim().parse().unwrap())
        .collect();
    run_search(
        world,
        FilterSet::default().with_query(query).with_price_levels(levels),
    )
    .await;
}

#[when("I search with an empty filter")]
async fn search_empty(world: &mut MesaWorld) {
    run_search(world, FilterSet::default()).await;
}

#[then(regex = r#"^the results should be "([^"]*)"$"#)]
async fn results_should_be(world: &mut MesaWorld, expected: String) {
    let expected: Vec<&str> = expected.split(", ").collect();
    let actual: Vec<&str> = world.results.iter().map(|p| p.place_id.as_str()).collect();
    assert_eq!(actual, expected);
}

#[then("there should be no results")]
async fn no_results(world: &mut MesaWorld) {
    assert!(world.results.is_empty());
}

#[then("the gateway should not have been called")]
async fn gateway_not_called(world: &mut MesaWorld) {
    assert!(world.harness.gateway.calls().is_empty());
}

#[given(regex = r"^(\d+) search results$")]
async fn search_results(world: &mut MesaWorld, count: usize) {
    world.paged.set_results((0..count).collect());
}

#[given(regex = r"^a page size of (\d+)$")]
async fn page_size(world: &mut MesaWorld, size: usize) {
    let items = world.paged.all().to_vec();
    world.paged = PagedResults::new(size);
    world.paged.set_results(items);
}

#[when("I load more results")]
async fn load_more(world: &mut MesaWorld) {
    world.paged.load_more();
}

#[then(regex = r"^(\d+) results should be visible$")]
async fn visible_count(world: &mut MesaWorld, count: usize) {
    assert_eq!(world.paged.visible().len(), count);
}
