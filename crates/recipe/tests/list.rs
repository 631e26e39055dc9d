use pantry_recipe::RecipesQuery;
use pantry_shared::Args;
use temp_dir::TempDir;

mod helpers;

use helpers::{entry, recipe_input};

#[tokio::test]
async fn filter_by_tags_author_and_membership() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john", "albert"]).await?;
    let tags = helpers::create_tags(&state, ["breakfast", "lunch", "dinner"]).await?;
    let ing = helpers::create_ingredients(&state, [("flour", "g")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let pancakes = cmd
        .create(
            recipe_input("Pancakes", vec![tags[0]], vec![entry(ing[0], 200)]),
            users[0],
        )
        .await?;
    let soup = cmd
        .create(
            recipe_input("Soup", vec![tags[1], tags[2]], vec![entry(ing[0], 20)]),
            users[1],
        )
        .await?;
    let pie = cmd
        .create(
            recipe_input("Pie", vec![tags[2]], vec![entry(ing[0], 300)]),
            users[0],
        )
        .await?;

    let ids = |page: pantry_shared::Page<pantry_recipe::RecipeRow>| {
        page.results.into_iter().map(|r| r.id).collect::<Vec<_>>()
    };

    let all = query.filter(RecipesQuery::default()).await?;
    assert_eq!(all.count, 3);
    assert_eq!(ids(all), vec![pie, soup, pancakes]);

    let by_tags = query
        .filter(RecipesQuery {
            tags: vec!["breakfast".to_owned(), "lunch".to_owned()],
            ..Default::default()
        })
        .await?;
    assert_eq!(ids(by_tags), vec![soup, pancakes]);

    let by_author = query
        .filter(RecipesQuery {
            author_id: Some(users[0]),
            tags: vec!["dinner".to_owned()],
            ..Default::default()
        })
        .await?;
    assert_eq!(ids(by_author), vec![pie]);

    cmd.favorites.add(users[1], pancakes).await?;
    cmd.shopping_cart.add(users[1], soup).await?;

    let favorited = query
        .filter(RecipesQuery {
            viewer_id: Some(users[1]),
            is_favorited: true,
            ..Default::default()
        })
        .await?;
    assert_eq!(ids(favorited), vec![pancakes]);

    let in_cart = query
        .filter(RecipesQuery {
            viewer_id: Some(users[1]),
            is_in_shopping_cart: true,
            ..Default::default()
        })
        .await?;
    assert_eq!(ids(in_cart), vec![soup]);

    let anonymous = query
        .filter(RecipesQuery {
            is_favorited: true,
            is_in_shopping_cart: true,
            ..Default::default()
        })
        .await?;
    assert_eq!(anonymous.count, 3);

    let paged = query
        .filter(RecipesQuery {
            args: Args::new(2, 2),
            ..Default::default()
        })
        .await?;
    assert_eq!(paged.count, 3);
    assert_eq!(ids(paged), vec![pancakes]);

    Ok(())
}

#[tokio::test]
async fn by_author_respects_limit() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let users = helpers::create_users(&state, ["john"]).await?;
    let tags = helpers::create_tags(&state, ["dinner"]).await?;
    let ing = helpers::create_ingredients(&state, [("flour", "g")]).await?;
    let cmd = pantry_recipe::Command::new(state.clone());
    let query = pantry_recipe::Query(state.read_db.clone());

    let mut ids = vec![];
    for name in ["Bread", "Pie", "Cake"] {
        ids.push(
            cmd.create(
                recipe_input(name, vec![tags[0]], vec![entry(ing[0], 100)]),
                users[0],
            )
            .await?,
        );
    }

    let limited = query.by_author(users[0], Some(2)).await?;
    assert_eq!(
        limited.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![ids[2], ids[1]]
    );

    let all = query.by_author(users[0], None).await?;
    assert_eq!(all.len(), 3);

    Ok(())
}
