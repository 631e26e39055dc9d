use pantry_recipe::{CreateInput, RecipesQuery};
use temp_dir::TempDir;

mod helpers;

use helpers::{entry, recipe_input};

#[tokio::test]
async fn create_persists_lines_and_tags() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["breakfast", "lunch"]).await?;
    let ingredients =
        helpers::create_ingredients(&state, [("flour", "g"), ("eggs", "pc"), ("milk", "ml")])
            .await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let id = cmd
        .create(
            recipe_input(
                "Pancakes",
                vec![tags[1], tags[0], tags[1]],
                vec![
                    entry(ingredients[0], 200),
                    entry(ingredients[1], 2),
                    entry(ingredients[2], 300),
                ],
            ),
            users[0],
        )
        .await?;

    let recipe = query.find(id).await?.unwrap();
    assert_eq!(recipe.name, "Pancakes");
    assert_eq!(recipe.author_id, users[0]);
    assert_eq!(recipe.cooking_time, 30);

    let lines = query.lines(id).await?;
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].name, "flour");
    assert_eq!(lines[0].amount, 200);
    assert_eq!(lines[1].measurement_unit, "pc");

    let recipe_tags = query.tags(id).await?;
    assert_eq!(
        recipe_tags.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![tags[0], tags[1]]
    );

    Ok(())
}

#[tokio::test]
async fn duplicate_ingredients_persist_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner"]).await?;
    let ingredients = helpers::create_ingredients(&state, [("flour", "g")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let res = cmd
        .create(
            recipe_input(
                "Bread",
                vec![tags[0]],
                vec![entry(ingredients[0], 200), entry(ingredients[0], 100)],
            ),
            users[0],
        )
        .await;

    assert_eq!(
        res.unwrap_err().to_string(),
        "Duplicate ingredients are not allowed."
    );
    assert_eq!(query.filter(RecipesQuery::default()).await?.count, 0);

    Ok(())
}

#[tokio::test]
async fn non_positive_values_are_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner"]).await?;
    let ingredients = helpers::create_ingredients(&state, [("flour", "g")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let zero_amount = cmd
        .create(
            recipe_input("Bread", vec![tags[0]], vec![entry(ingredients[0], 0)]),
            users[0],
        )
        .await;
    assert!(matches!(
        zero_amount,
        Err(pantry_shared::Error::Validate(_))
    ));

    let zero_time = cmd
        .create(
            CreateInput {
                cooking_time: 0,
                ..recipe_input("Bread", vec![tags[0]], vec![entry(ingredients[0], 10)])
            },
            users[0],
        )
        .await;
    assert!(matches!(zero_time, Err(pantry_shared::Error::Validate(_))));

    let no_tags = cmd
        .create(
            recipe_input("Bread", vec![], vec![entry(ingredients[0], 10)]),
            users[0],
        )
        .await;
    assert!(matches!(no_tags, Err(pantry_shared::Error::User(_))));

    assert_eq!(query.filter(RecipesQuery::default()).await?.count, 0);

    Ok(())
}

#[tokio::test]
async fn unknown_references_roll_back() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner"]).await?;
    let ingredients = helpers::create_ingredients(&state, [("flour", "g")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let unknown_tag = cmd
        .create(
            recipe_input(
                "Bread",
                vec![tags[0], tags[0] + 100],
                vec![entry(ingredients[0], 10)],
            ),
            users[0],
        )
        .await;
    assert_eq!(unknown_tag.unwrap_err().to_string(), "tag not found");

    let unknown_ingredient = cmd
        .create(
            recipe_input(
                "Bread",
                vec![tags[0]],
                vec![entry(ingredients[0], 10), entry(ingredients[0] + 100, 5)],
            ),
            users[0],
        )
        .await;
    assert_eq!(
        unknown_ingredient.unwrap_err().to_string(),
        "ingredient not found"
    );

    assert_eq!(query.filter(RecipesQuery::default()).await?.count, 0);

    Ok(())
}
