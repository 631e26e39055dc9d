use pantry_recipe::UpdateInput;
use temp_dir::TempDir;

mod helpers;

use helpers::{entry, recipe_input, requester};

#[tokio::test]
async fn replace_ingredients_swaps_all_lines() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner"]).await?;
    let ing = helpers::create_ingredients(
        &state,
        [("flour", "g"), ("eggs", "pc"), ("milk", "ml"), ("salt", "g")],
    )
    .await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let id = cmd
        .create(
            recipe_input("Bread", vec![tags[0]], vec![entry(ing[0], 500), entry(ing[1], 2)]),
            users[0],
        )
        .await?;

    cmd.replace_ingredients(id, vec![entry(ing[2], 250), entry(ing[3], 5), entry(ing[0], 400)])
        .await?;

    let lines = query
        .lines(id)
        .await?
        .into_iter()
        .map(|line| (line.id, line.amount))
        .collect::<Vec<_>>();
    assert_eq!(lines, vec![(ing[2], 250), (ing[3], 5), (ing[0], 400)]);

    Ok(())
}

#[tokio::test]
async fn failed_replace_keeps_previous_lines() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner"]).await?;
    let ing = helpers::create_ingredients(&state, [("flour", "g"), ("eggs", "pc")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let id = cmd
        .create(
            recipe_input("Bread", vec![tags[0]], vec![entry(ing[0], 500)]),
            users[0],
        )
        .await?;

    let unknown = cmd
        .replace_ingredients(id, vec![entry(ing[1], 2), entry(ing[1] + 100, 1)])
        .await;
    assert!(matches!(unknown, Err(pantry_shared::Error::NotFound(_))));

    let duplicate = cmd
        .replace_ingredients(id, vec![entry(ing[1], 2), entry(ing[1], 1)])
        .await;
    assert!(matches!(duplicate, Err(pantry_shared::Error::User(_))));

    let negative = cmd.replace_ingredients(id, vec![entry(ing[1], -2)]).await;
    assert!(matches!(negative, Err(pantry_shared::Error::Validate(_))));

    let missing_recipe = cmd.replace_ingredients(id + 1, vec![entry(ing[1], 2)]).await;
    assert!(matches!(
        missing_recipe,
        Err(pantry_shared::Error::NotFound(_))
    ));

    let lines = query.lines(id).await?;
    assert_eq!(lines.len(), 1);
    assert_eq!((lines[0].id, lines[0].amount), (ing[0], 500));

    Ok(())
}

#[tokio::test]
async fn patch_keeps_absent_fields() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner", "vegan"]).await?;
    let ing = helpers::create_ingredients(&state, [("flour", "g"), ("eggs", "pc")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let id = cmd
        .create(
            recipe_input("Bread", vec![tags[0]], vec![entry(ing[0], 500)]),
            users[0],
        )
        .await?;

    cmd.update(
        id,
        UpdateInput {
            name: Some("Sourdough".to_owned()),
            ..Default::default()
        },
        requester(users[0]),
    )
    .await?;

    let recipe = query.find(id).await?.unwrap();
    assert_eq!(recipe.name, "Sourdough");
    assert_eq!(recipe.text, "How to cook Bread");
    assert_eq!(query.lines(id).await?.len(), 1);
    assert_eq!(query.tags(id).await?[0].id, tags[0]);

    cmd.update(
        id,
        UpdateInput {
            tags: Some(vec![tags[1]]),
            ingredients: Some(vec![entry(ing[1], 3), entry(ing[0], 100)]),
            cooking_time: Some(90),
            ..Default::default()
        },
        requester(users[0]),
    )
    .await?;

    let recipe = query.find(id).await?.unwrap();
    assert_eq!(recipe.cooking_time, 90);
    assert_eq!(
        query.tags(id).await?.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![tags[1]]
    );
    assert_eq!(query.lines(id).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn failed_update_rolls_back_every_change() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner", "vegan"]).await?;
    let ing = helpers::create_ingredients(&state, [("flour", "g")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let id = cmd
        .create(
            recipe_input("Bread", vec![tags[0]], vec![entry(ing[0], 500)]),
            users[0],
        )
        .await?;

    let res = cmd
        .update(
            id,
            UpdateInput {
                name: Some("Sourdough".to_owned()),
                tags: Some(vec![tags[1]]),
                ingredients: Some(vec![entry(ing[0] + 100, 1)]),
                ..Default::default()
            },
            requester(users[0]),
        )
        .await;
    assert!(matches!(res, Err(pantry_shared::Error::NotFound(_))));

    let recipe = query.find(id).await?.unwrap();
    assert_eq!(recipe.name, "Bread");
    assert_eq!(query.tags(id).await?[0].id, tags[0]);
    assert_eq!(query.lines(id).await?[0].id, ing[0]);

    Ok(())
}

#[tokio::test]
async fn only_author_or_superuser_can_edit() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john", "albert"]).await?;
    let tags = helpers::create_tags(&state, ["dinner"]).await?;
    let ing = helpers::create_ingredients(&state, [("flour", "g")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let id = cmd
        .create(
            recipe_input("Bread", vec![tags[0]], vec![entry(ing[0], 500)]),
            users[0],
        )
        .await?;

    let patch = UpdateInput {
        name: Some("Stolen".to_owned()),
        ..Default::default()
    };

    let res = cmd.update(id, patch.clone(), requester(users[1])).await;
    assert!(matches!(res, Err(pantry_shared::Error::Forbidden)));

    let res = cmd.delete(id, requester(users[1])).await;
    assert!(matches!(res, Err(pantry_shared::Error::Forbidden)));

    let admin = pantry_shared::Requester {
        id: users[1],
        is_superuser: true,
    };
    cmd.update(id, patch, admin).await?;
    assert_eq!(query.find(id).await?.unwrap().name, "Stolen");

    let res = cmd.update(id + 1, UpdateInput::default(), admin).await;
    assert!(matches!(res, Err(pantry_shared::Error::NotFound(_))));

    Ok(())
}
